use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let catalog_result = check_catalog(&state);
    health
        .services
        .insert("catalog".to_string(), catalog_result.clone());

    health.services.insert(
        "audit_log".to_string(),
        ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("{} backend", state.audit_log.backend())),
        },
    );

    health.services.insert(
        "sessions".to_string(),
        ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("{} open", state.sessions.len().await)),
        },
    );

    if catalog_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

fn check_catalog(state: &AppState) -> ServiceStatus {
    if state.catalog.is_empty() {
        ServiceStatus {
            status: "error".to_string(),
            details: Some("Catalog has no tours".to_string()),
        }
    } else {
        ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("{} tours", state.catalog.len())),
        }
    }
}
