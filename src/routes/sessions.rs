use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

use crate::models::inquiry::InquiryFormPatch;
use crate::models::session::{OpenSessionRequest, SessionSnapshot};
use crate::services::session_service::SessionError;
use crate::state::AppState;

fn parse_session_id(raw: &str) -> Result<Uuid, HttpResponse> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| HttpResponse::BadRequest().json(json!({ "error": "Invalid session ID" })))
}

fn error_response(err: SessionError) -> HttpResponse {
    match err {
        SessionError::NotFound(_) => HttpResponse::NotFound().json(json!({ "error": err.to_string() })),
        SessionError::Busy(_) => HttpResponse::Conflict().json(json!({ "error": err.to_string() })),
        SessionError::Invalid(snapshot) => HttpResponse::UnprocessableEntity().json(*snapshot),
    }
}

fn respond(result: Result<SessionSnapshot, SessionError>) -> HttpResponse {
    match result {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(err) => error_response(err),
    }
}

/*
    POST /api/sessions
*/
pub async fn open(state: web::Data<AppState>, input: web::Json<OpenSessionRequest>) -> impl Responder {
    match state.catalog.find(input.tour_id) {
        Some(entry) => HttpResponse::Created().json(state.sessions.open(entry).await),
        None => HttpResponse::NotFound().json(json!({ "error": "Tour not found" })),
    }
}

/*
    GET /api/sessions/{id}
*/
pub async fn get(path: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    match parse_session_id(&path.into_inner()) {
        Ok(id) => respond(state.sessions.get(id).await),
        Err(resp) => resp,
    }
}

/*
    GET /api/sessions/{id}/departures
*/
pub async fn departures(path: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    match parse_session_id(&path.into_inner()) {
        Ok(id) => match state.sessions.departures(id).await {
            Ok(dates) => HttpResponse::Ok().json(dates),
            Err(err) => error_response(err),
        },
        Err(resp) => resp,
    }
}

/*
    PATCH /api/sessions/{id}
*/
pub async fn update(
    path: web::Path<String>,
    state: web::Data<AppState>,
    input: web::Json<InquiryFormPatch>,
) -> impl Responder {
    match parse_session_id(&path.into_inner()) {
        Ok(id) => respond(state.sessions.update(id, &input).await),
        Err(resp) => resp,
    }
}

/*
    POST /api/sessions/{id}/travelers/increment
*/
pub async fn increment_travelers(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> impl Responder {
    match parse_session_id(&path.into_inner()) {
        Ok(id) => respond(state.sessions.increment_travelers(id).await),
        Err(resp) => resp,
    }
}

/*
    POST /api/sessions/{id}/travelers/decrement
*/
pub async fn decrement_travelers(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> impl Responder {
    match parse_session_id(&path.into_inner()) {
        Ok(id) => respond(state.sessions.decrement_travelers(id).await),
        Err(resp) => resp,
    }
}

/*
    POST /api/sessions/{id}/submit
*/
pub async fn submit(path: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    match parse_session_id(&path.into_inner()) {
        Ok(id) => match state.sessions.submit(id).await {
            Ok(snapshot) => HttpResponse::Accepted().json(snapshot),
            Err(err) => error_response(err),
        },
        Err(resp) => resp,
    }
}

/*
    DELETE /api/sessions/{id}
*/
pub async fn close(path: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    match parse_session_id(&path.into_inner()) {
        Ok(id) => match state.sessions.close(id).await {
            Ok(()) => HttpResponse::NoContent().finish(),
            Err(err) => error_response(err),
        },
        Err(resp) => resp,
    }
}
