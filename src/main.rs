use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info};

use nepal_tours_api::config::AppConfig;
use nepal_tours_api::routes;
use nepal_tours_api::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    info!("Application starting...");

    let config = AppConfig::from_env();
    let host = config.host.clone();
    let port = config.port;

    let state = match AppState::from_config(config).await {
        Ok(state) => web::Data::new(state),
        Err(err) => {
            error!("Failed to initialise application state: {}", err);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, err));
        }
    };

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
