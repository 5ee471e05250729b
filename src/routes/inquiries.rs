use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use log::info;
use serde_json::json;

use crate::models::inquiry::{InquiryRequest, InquiryResponse};
use crate::routes::tours::lookup_tour;
use crate::services::audit_log_service::record_best_effort;
use crate::services::inquiry_service::InquiryService;
use crate::services::pricing_service::TravelerCount;
use crate::state::AppState;

/*
    /api/tours/{id}/inquiries
*/
pub async fn submit(
    path: web::Path<String>,
    state: web::Data<AppState>,
    input: web::Json<InquiryRequest>,
) -> impl Responder {
    let entry = match lookup_tour(&state, &path.into_inner()) {
        Ok(entry) => entry,
        Err(resp) => return resp,
    };

    let request = input.into_inner();
    let travelers = TravelerCount::clamped(request.travelers, state.config.max_travelers);
    let schedule = state.config.departure_schedule();

    let booking = match InquiryService::submit(entry, &request.form, travelers, &schedule, Utc::now()) {
        Ok(booking) => booking,
        Err(errors) => return HttpResponse::UnprocessableEntity().json(json!({ "errors": errors })),
    };

    record_best_effort(state.audit_log.as_ref(), &booking).await;
    info!(
        "Booking inquiry {} for tour {} ({} travelers)",
        booking.id, booking.tour_id, booking.traveler_count
    );

    let whatsapp_url = state.handoff.booking_link(&booking, &entry.tour).to_string();
    HttpResponse::Ok().json(InquiryResponse {
        booking,
        whatsapp_url,
    })
}
