//! JSON API consumed by the single-page front end.

mod error;
mod handlers;

pub use error::{ApiError, ErrorBody};
pub use handlers::{CreateReservationRequest, LoginRequest, MessageRequest, MessageResponse};

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::assistant::Assistant;
use crate::engine::Engine;
use crate::observability;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub assistant: Arc<Assistant>,
}

impl AppState {
    pub fn new(engine: Arc<Engine>, assistant: Arc<Assistant>) -> Self {
        Self { engine, assistant }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/login", post(handlers::login))
        .route("/api/users/{user_id}", get(handlers::get_user))
        .route("/api/users/{user_id}/reservations", get(handlers::history))
        .route(
            "/api/users/{user_id}/reservations/active",
            get(handlers::active_reservation),
        )
        .route("/api/seats", get(handlers::list_seats))
        .route("/api/seats/{seat_id}", get(handlers::get_seat))
        .route("/api/floors", get(handlers::floors))
        .route("/api/reservations", post(handlers::create_reservation))
        .route(
            "/api/reservations/{reservation_id}",
            get(handlers::get_reservation),
        )
        .route(
            "/api/reservations/{reservation_id}/cancel",
            post(handlers::cancel_reservation),
        )
        .route("/api/assistant/messages", post(handlers::send_message))
        .route_layer(middleware::from_fn(track_requests))
        .route("/healthz", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Request count and latency per route template.
async fn track_requests(req: Request, next: Next) -> Response {
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let method = req.method().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    metrics::counter!(
        observability::REQUESTS_TOTAL,
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        observability::REQUEST_DURATION_SECONDS,
        "method" => method,
        "path" => path
    )
    .record(start.elapsed().as_secs_f64());
    response
}
