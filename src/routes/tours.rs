use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::models::filter::FilterCriteria;
use crate::services::catalog_service::CatalogEntry;
use crate::services::pricing_service::{PricingService, TravelerCount};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SuggestParams {
    q: Option<String>,
}

#[derive(Deserialize)]
pub struct QuoteParams {
    travelers: Option<u32>,
}

/// Resolve a `{id}` path segment to a catalog entry, or the error response.
pub(crate) fn lookup_tour<'a>(
    state: &'a AppState,
    raw_id: &str,
) -> Result<&'a CatalogEntry, HttpResponse> {
    let id: u32 = raw_id
        .trim()
        .parse()
        .map_err(|_| HttpResponse::BadRequest().json(json!({ "error": "Invalid tour ID" })))?;
    state
        .catalog
        .find(id)
        .ok_or_else(|| HttpResponse::NotFound().json(json!({ "error": "Tour not found" })))
}

/*
    /api/tours?search=&activity=&duration=&price=
*/
pub async fn list_tours(
    state: web::Data<AppState>,
    criteria: web::Query<FilterCriteria>,
) -> impl Responder {
    let tours = state.catalog.filter(&criteria);
    HttpResponse::Ok().json(tours)
}

/*
    /api/tours/filters
*/
pub async fn filter_options(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.catalog.filter_options())
}

/*
    /api/tours/suggest?q=
*/
pub async fn suggest(
    state: web::Data<AppState>,
    params: web::Query<SuggestParams>,
) -> impl Responder {
    let query = params.q.as_deref().unwrap_or_default();
    HttpResponse::Ok().json(state.catalog.quick_search(query))
}

/*
    /api/tours/{id}
*/
pub async fn get_by_id(path: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    match lookup_tour(&state, &path.into_inner()) {
        Ok(entry) => HttpResponse::Ok().json(&entry.tour),
        Err(resp) => resp,
    }
}

/*
    /api/tours/{id}/departures
*/
pub async fn departures(path: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    match lookup_tour(&state, &path.into_inner()) {
        Ok(entry) => {
            let dates = state
                .config
                .departure_schedule()
                .candidates(entry, Utc::now().date_naive());
            HttpResponse::Ok().json(dates)
        }
        Err(resp) => resp,
    }
}

/*
    /api/tours/{id}/quote?travelers=N
*/
pub async fn quote(
    path: web::Path<String>,
    params: web::Query<QuoteParams>,
    state: web::Data<AppState>,
) -> impl Responder {
    match lookup_tour(&state, &path.into_inner()) {
        Ok(entry) => {
            let travelers =
                TravelerCount::clamped(params.travelers.unwrap_or(1), state.config.max_travelers);
            HttpResponse::Ok().json(PricingService::quote(entry.unit_price, travelers))
        }
        Err(resp) => resp,
    }
}
