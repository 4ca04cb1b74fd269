//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::{
    engine::CategoryView,
    error::{EngineError, ValidationErrors},
    state::{AppState, HistoryItem, Timer, TimerSpec},
};
use super::responses::{
    ApiError, ApiResponse, HealthResponse, StatusResponse, TimerCounts, ToggleResponse,
};

type ApiResult<T> = Result<T, ApiError>;

/// Record the action and answer with the current collection
async fn done(state: &AppState, action: String, message: String) -> ApiResult<Json<ApiResponse>> {
    state.record_action(action);
    let timers = state.timers.list().await?;
    Ok(Json(ApiResponse::ok(message, timers)))
}

/// Handle GET /timers
pub async fn list_timers_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Timer>>> {
    Ok(Json(state.timers.list().await?))
}

/// Handle POST /timers - Validate and create a timer
pub async fn add_timer_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Timer>)> {
    let spec = match body {
        Ok(Json(body)) => TimerSpec::from_json(&body).map_err(EngineError::from)?,
        Err(rejection) => {
            let mut errors = ValidationErrors::default();
            errors.add("body", rejection.body_text());
            return Err(EngineError::from(errors).into());
        }
    };
    let timer = state.timers.add(spec).await?;
    info!("Timer '{}' created in {}", timer.name, timer.category);
    state.record_action(format!("add {}", timer.id));
    Ok((StatusCode::CREATED, Json(timer)))
}

/// Handle POST /timers/:id/start
pub async fn start_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse>> {
    state.timers.start(&id).await?;
    done(&state, format!("start {}", id), "Timer started".to_string()).await
}

/// Handle POST /timers/:id/pause
pub async fn pause_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse>> {
    state.timers.pause(&id).await?;
    done(&state, format!("pause {}", id), "Timer paused".to_string()).await
}

/// Handle POST /timers/:id/reset
pub async fn reset_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse>> {
    state.timers.reset(&id).await?;
    done(&state, format!("reset {}", id), "Timer reset".to_string()).await
}

/// Handle DELETE /timers/:id
pub async fn delete_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse>> {
    state.timers.remove(&id).await?;
    done(&state, format!("delete {}", id), "Timer deleted".to_string()).await
}

/// Handle GET /categories - Timers grouped by category with expansion flags
pub async fn list_categories_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<CategoryView>>> {
    Ok(Json(state.timers.categories().await?))
}

/// Handle POST /categories/:category/start
pub async fn start_category_handler(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> ApiResult<Json<ApiResponse>> {
    state.timers.start_category(&category).await?;
    done(
        &state,
        format!("start-all {}", category),
        format!("Started timers in {}", category),
    )
    .await
}

/// Handle POST /categories/:category/pause
pub async fn pause_category_handler(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> ApiResult<Json<ApiResponse>> {
    state.timers.pause_category(&category).await?;
    done(
        &state,
        format!("pause-all {}", category),
        format!("Paused timers in {}", category),
    )
    .await
}

/// Handle POST /categories/:category/reset
pub async fn reset_category_handler(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> ApiResult<Json<ApiResponse>> {
    state.timers.reset_category(&category).await?;
    done(
        &state,
        format!("reset-all {}", category),
        format!("Reset timers in {}", category),
    )
    .await
}

/// Handle POST /categories/:category/toggle - Flip expansion
pub async fn toggle_category_handler(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> ApiResult<Json<ToggleResponse>> {
    let expanded = state.timers.toggle_category(&category).await?;
    Ok(Json(ToggleResponse {
        category: category.trim().to_string(),
        expanded,
    }))
}

/// Handle GET /history - Completed runs, newest first
pub async fn history_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<HistoryItem>>> {
    Ok(Json(state.timers.history().await?))
}

/// Handle DELETE /history
pub async fn clear_history_handler(State(state): State<Arc<AppState>>) -> ApiResult<StatusCode> {
    state.timers.clear_history().await?;
    state.record_action("clear-history");
    info!("History cleared");
    Ok(StatusCode::NO_CONTENT)
}

/// Handle GET /history/export - Pretty-printed JSON download
pub async fn export_history_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    let body = state.timers.export_history().await?;
    let filename = format!("timer-history-{}.json", Utc::now().format("%Y-%m-%d"));

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    ))
}

/// Handle GET /status - Return timer counts and server metadata
pub async fn status_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<StatusResponse>> {
    let timers = state.timers.list().await?;
    let last = state.last_action();

    Ok(Json(StatusResponse {
        timers: TimerCounts::from_timers(&timers),
        uptime: state.uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action_time: last.as_ref().map(|l| l.at),
        last_action: last.map(|l| l.action),
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
