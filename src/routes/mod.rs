use actix_web::web;

pub mod contact;
pub mod health;
pub mod inquiries;
pub mod sessions;
pub mod tours;

/// Register every route. Shared by the server and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/tours")
                        .route("", web::get().to(tours::list_tours))
                        .route("/filters", web::get().to(tours::filter_options))
                        .route("/suggest", web::get().to(tours::suggest))
                        .route("/{id}", web::get().to(tours::get_by_id))
                        .route("/{id}/departures", web::get().to(tours::departures))
                        .route("/{id}/quote", web::get().to(tours::quote))
                        .route("/{id}/inquiries", web::post().to(inquiries::submit)),
                )
                .service(
                    web::scope("/sessions")
                        .route("", web::post().to(sessions::open))
                        .route("/{id}", web::get().to(sessions::get))
                        .route("/{id}", web::patch().to(sessions::update))
                        .route("/{id}", web::delete().to(sessions::close))
                        .route("/{id}/departures", web::get().to(sessions::departures))
                        .route(
                            "/{id}/travelers/increment",
                            web::post().to(sessions::increment_travelers),
                        )
                        .route(
                            "/{id}/travelers/decrement",
                            web::post().to(sessions::decrement_travelers),
                        )
                        .route("/{id}/submit", web::post().to(sessions::submit)),
                )
                .service(
                    web::scope("/contact")
                        .route("", web::post().to(contact::submit))
                        .route("/whatsapp", web::get().to(contact::whatsapp_redirect)),
                ),
        );
}
