#![forbid(unsafe_code)]

//! # Nebula API
//!
//! The HTTP surface: webhook dispatch, cron-expression validation, and
//! execution listing/lookup. Authentication and rate limiting are
//! explicitly out of scope here.

mod error;
pub mod handlers;
mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Build the full router over `state`.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/automations/webhook/{*path}", post(handlers::webhook::dispatch))
        .route("/automations/cron/validate", post(handlers::cron::validate))
        .route("/executions", get(handlers::executions::list))
        .route("/executions/{id}", get(handlers::executions::get_one))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
