use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::assistant::{FallbackReason, Turn};
use crate::model::*;

use super::error::ApiError;
use super::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    /// Accepted and ignored.
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SeatQuery {
    pub floor: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    pub user_id: Ulid,
    pub seat_id: SeatId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<Turn>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub reply: String,
    pub degraded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FallbackReason>,
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state.engine.login(&req.email).await?;
    Ok(Json(user))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Ulid>,
) -> Result<Json<User>, ApiError> {
    state
        .engine
        .get_user(user_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("user", user_id))
}

pub async fn list_seats(
    State(state): State<AppState>,
    Query(query): Query<SeatQuery>,
) -> Json<Vec<SeatInfo>> {
    Json(state.engine.get_seats(query.floor).await)
}

pub async fn get_seat(
    State(state): State<AppState>,
    Path(seat_id): Path<SeatId>,
) -> Result<Json<SeatInfo>, ApiError> {
    state
        .engine
        .get_seat(&seat_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("seat", seat_id))
}

pub async fn floors(State(state): State<AppState>) -> Json<Vec<FloorSummary>> {
    Json(state.engine.floor_summaries().await)
}

pub async fn active_reservation(
    State(state): State<AppState>,
    Path(user_id): Path<Ulid>,
) -> Json<Option<ReservationInfo>> {
    Json(state.engine.get_active_reservation(user_id).await)
}

pub async fn history(
    State(state): State<AppState>,
    Path(user_id): Path<Ulid>,
) -> Json<Vec<ReservationInfo>> {
    Json(state.engine.get_history(user_id).await)
}

pub async fn create_reservation(
    State(state): State<AppState>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let reservation = state
        .engine
        .create_reservation(req.user_id, &req.seat_id)
        .await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

pub async fn get_reservation(
    State(state): State<AppState>,
    Path(reservation_id): Path<Ulid>,
) -> Result<Json<ReservationInfo>, ApiError> {
    state
        .engine
        .get_reservation(reservation_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("reservation", reservation_id))
}

/// Always 204, including for unknown ids.
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Path(reservation_id): Path<Ulid>,
) -> StatusCode {
    state.engine.cancel_reservation(reservation_id).await;
    StatusCode::NO_CONTENT
}

pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<MessageRequest>,
) -> Json<MessageResponse> {
    let reply = state.assistant.send_message(&req.message, &req.history).await;
    Json(MessageResponse {
        reply: reply.text().to_string(),
        degraded: reply.is_degraded(),
        reason: reply.fallback_reason(),
    })
}
