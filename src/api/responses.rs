//! API response structures

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{
    error::EngineError,
    state::{Timer, TimerStatus},
};

/// API response structure for state change endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timers: Vec<Timer>,
}

impl ApiResponse {
    /// Create a successful response carrying the current collection
    pub fn ok(message: impl Into<String>, timers: Vec<Timer>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            timers,
        }
    }
}

/// Timers per lifecycle status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerCounts {
    pub total: usize,
    pub idle: usize,
    pub running: usize,
    pub paused: usize,
    pub completed: usize,
}

impl TimerCounts {
    pub fn from_timers(timers: &[Timer]) -> Self {
        timers.iter().fold(
            Self {
                total: timers.len(),
                ..Self::default()
            },
            |mut counts, timer| {
                match timer.status {
                    TimerStatus::Idle => counts.idle += 1,
                    TimerStatus::Running => counts.running += 1,
                    TimerStatus::Paused => counts.paused += 1,
                    TimerStatus::Completed => counts.completed += 1,
                }
                counts
            },
        )
    }
}

/// Status response with timer counts and server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timers: TimerCounts,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Result of toggling a category's expansion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub category: String,
    pub expanded: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Error body; `fields` is present for validation failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

/// Engine failure rendered as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, fields) = match &self.0 {
            EngineError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Some(
                    errors
                        .fields
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.clone()))
                        .collect(),
                ),
            ),
            EngineError::Store(e) => {
                error!("Request failed to persist: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
            EngineError::Stopped => (StatusCode::SERVICE_UNAVAILABLE, None),
        };

        let body = ErrorResponse {
            status: "error".to_string(),
            message: self.0.to_string(),
            fields,
        };
        (code, Json(body)).into_response()
    }
}
