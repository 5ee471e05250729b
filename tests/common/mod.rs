use actix_web::{web, App};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use nepal_tours_api::config::AppConfig;
use nepal_tours_api::routes;
use nepal_tours_api::services::audit_log_service::MemoryAuditLog;
use nepal_tours_api::services::catalog_service::Catalog;
use nepal_tours_api::state::AppState;

pub struct TestApp {
    pub state: web::Data<AppState>,
    pub audit: Arc<MemoryAuditLog>,
}

impl TestApp {
    pub fn new() -> Self {
        let config = AppConfig {
            submit_delay: Duration::from_millis(10),
            reset_delay: Duration::from_millis(60),
            ..AppConfig::default()
        };
        let audit = Arc::new(MemoryAuditLog::new());
        let catalog = Catalog::bundled().expect("bundled catalog loads");
        let state = AppState::new(config, catalog, audit.clone()).expect("valid app state");

        Self {
            state: web::Data::new(state),
            audit,
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .configure(routes::configure)
    }

    /// First departure offered for `tour_id` today, as the client would send it.
    pub fn first_departure(&self, tour_id: u32) -> String {
        let entry = self.state.catalog.find(tour_id).expect("tour exists");
        self.state
            .config
            .departure_schedule()
            .candidates(entry, Utc::now().date_naive())[0]
            .to_string()
    }
}

pub fn valid_inquiry(departure_date: &str, travelers: u32) -> serde_json::Value {
    serde_json::json!({
        "name": "Ann",
        "email": "ann@example.com",
        "departureDate": departure_date,
        "phone": "+977 9800000000",
        "travelers": travelers
    })
}
