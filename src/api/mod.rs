//! HTTP API module
//!
//! The control surface for the timer actor: timer and category commands,
//! history access, and status.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timers", get(list_timers_handler).post(add_timer_handler))
        .route("/timers/:id", delete(delete_timer_handler))
        .route("/timers/:id/start", post(start_timer_handler))
        .route("/timers/:id/pause", post(pause_timer_handler))
        .route("/timers/:id/reset", post(reset_timer_handler))
        .route("/categories", get(list_categories_handler))
        .route("/categories/:category/start", post(start_category_handler))
        .route("/categories/:category/pause", post(pause_category_handler))
        .route("/categories/:category/reset", post(reset_category_handler))
        .route("/categories/:category/toggle", post(toggle_category_handler))
        .route("/history", get(history_handler).delete(clear_history_handler))
        .route("/history/export", get(export_history_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
