// src/handler/support_handler.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::supportdtos::{AdminTicketUpdateDto, CreateTicketDto, TechnicianResponseDto},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::supportmodel::SupportQueryParams,
    AppState,
};

pub fn support_handler() -> Router {
    Router::new()
        .route("/tickets", get(get_tickets).post(create_ticket))
        .route("/tickets/:ticket_id", get(get_ticket))
        .route("/tickets/:ticket_id/response", post(submit_response))
        .route("/tickets/:ticket_id/admin", put(admin_update_ticket))
        .route("/my-tickets", get(get_my_tickets))
}

// File a support ticket or dispute
pub async fn create_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateTicketDto>,
) -> Result<impl IntoResponse, HttpError> {
    let ticket = app_state
        .ticket_service
        .create_ticket(&auth.session(), body)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": ticket
    })))
}

// All tickets (admin)
pub async fn get_tickets(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(params): Query<SupportQueryParams>,
) -> Result<impl IntoResponse, HttpError> {
    let page = params.page.unwrap_or(1);
    let tickets = app_state
        .ticket_service
        .list_tickets(&auth.session(), params)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "tickets": tickets,
            "page": page
        }
    })))
}

// Tickets the caller filed or is accused in
pub async fn get_my_tickets(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let tickets = app_state.ticket_service.my_tickets(&auth.session()).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": tickets
    })))
}

pub async fn get_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(ticket_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let view = app_state
        .ticket_service
        .get_ticket(&auth.session(), ticket_id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": view
    })))
}

// Accused party's defence
pub async fn submit_response(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(ticket_id): Path<Uuid>,
    Json(body): Json<TechnicianResponseDto>,
) -> Result<impl IntoResponse, HttpError> {
    let ticket = app_state
        .ticket_service
        .submit_response(&auth.session(), ticket_id, body)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": ticket
    })))
}

// Status, verdict and financial actions
pub async fn admin_update_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(ticket_id): Path<Uuid>,
    Json(body): Json<AdminTicketUpdateDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let outcome = app_state
        .verdict_service
        .apply_admin_update(&auth.session(), ticket_id, body)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": outcome.ticket
    })))
}
