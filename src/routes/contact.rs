use actix_web::{http::header, web, HttpResponse, Responder};
use log::info;
use serde_json::json;

use crate::models::contact::{ContactInquiry, ContactResponse};
use crate::services::inquiry_service::validate_contact;
use crate::state::AppState;

/*
    POST /api/contact
*/
pub async fn submit(state: web::Data<AppState>, input: web::Json<ContactInquiry>) -> impl Responder {
    let inquiry = input.into_inner();

    let errors = validate_contact(&inquiry);
    if !errors.is_empty() {
        return HttpResponse::UnprocessableEntity().json(json!({ "errors": errors }));
    }

    info!("{:?} inquiry received from {}", inquiry.kind, inquiry.email.trim());

    HttpResponse::Ok().json(ContactResponse {
        status: "received".to_string(),
        whatsapp_url: state.handoff.contact_link(&inquiry).to_string(),
    })
}

/*
    GET /api/contact/whatsapp
*/
pub async fn whatsapp_redirect(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Found()
        .insert_header((header::LOCATION, state.handoff.default_link().to_string()))
        .finish()
}
