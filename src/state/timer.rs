//! Timer record and its single-timer transitions
//!
//! Transitions never mutate a timer in place: each returns the next value so
//! the registry can replace its collection wholesale.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::ValidationErrors;

/// Lifecycle status of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    /// Terminal until an explicit reset.
    Completed,
}

/// A named, categorized countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    pub id: String,
    pub name: String,
    pub duration: u64,
    pub remaining_time: u64,
    pub category: String,
    pub status: TimerStatus,
    pub halfway_alert: bool,
    pub halfway_alert_triggered: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Timer {
    /// Create an idle timer with a fresh id from a validated request.
    ///
    /// `created_at` is kept at the millisecond precision it is stored with.
    pub fn create(spec: NewTimer, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: spec.name,
            duration: spec.duration,
            remaining_time: spec.duration,
            category: spec.category,
            status: TimerStatus::Idle,
            halfway_alert: spec.halfway_alert,
            halfway_alert_triggered: false,
            created_at: created_at.trunc_subsecs(3),
        }
    }

    /// Category used for grouping and bulk matching
    pub fn category_key(&self) -> &str {
        self.category.trim()
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.category_key() == category.trim()
    }

    pub fn is_completed(&self) -> bool {
        self.status == TimerStatus::Completed
    }

    /// Running unless completed
    pub fn started(&self) -> Self {
        if self.is_completed() {
            return self.clone();
        }
        Self {
            status: TimerStatus::Running,
            ..self.clone()
        }
    }

    /// Paused only when currently running
    pub fn paused(&self) -> Self {
        if self.status != TimerStatus::Running {
            return self.clone();
        }
        Self {
            status: TimerStatus::Paused,
            ..self.clone()
        }
    }

    /// Back to a full idle countdown, from any status
    pub fn reset(&self) -> Self {
        Self {
            remaining_time: self.duration,
            status: TimerStatus::Idle,
            halfway_alert_triggered: false,
            ..self.clone()
        }
    }

    pub fn apply(&self, transition: Transition) -> Self {
        match transition {
            Transition::Start => self.started(),
            Transition::Pause => self.paused(),
            Transition::Reset => self.reset(),
        }
    }
}

/// User-issued state change for one or more timers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    Start,
    Pause,
    Reset,
}

/// Raw timer request as submitted by a client
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub halfway_alert: bool,
}

/// A timer request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimer {
    pub name: String,
    pub category: String,
    pub duration: u64,
    pub halfway_alert: bool,
}

impl TimerSpec {
    /// Read a request body field by field.
    ///
    /// A field of the wrong JSON type is reported under its own name together
    /// with whatever [`TimerSpec::validate`] finds in the remaining fields.
    pub fn from_json(body: &Value) -> Result<TimerSpec, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let Some(object) = body.as_object() else {
            errors.add("body", "Request body must be a JSON object");
            return Err(errors);
        };

        let spec = TimerSpec {
            name: text_field(object.get("name"), "name", "Timer name must be text", &mut errors),
            category: text_field(
                object.get("category"),
                "category",
                "Category must be text",
                &mut errors,
            ),
            duration: match object.get("duration") {
                None | Some(Value::Null) => 0,
                Some(Value::Number(n)) => match n.as_i64() {
                    Some(seconds) => seconds,
                    None => {
                        errors.add("duration", "Duration must be a whole number of seconds");
                        0
                    }
                },
                Some(_) => {
                    errors.add("duration", "Duration must be a positive number");
                    0
                }
            },
            halfway_alert: match object.get("halfwayAlert") {
                None | Some(Value::Null) => false,
                Some(Value::Bool(b)) => *b,
                Some(_) => {
                    errors.add("halfwayAlert", "Halfway alert must be true or false");
                    false
                }
            },
        };

        if errors.is_empty() {
            return Ok(spec);
        }
        if let Err(rest) = spec.validate() {
            errors.merge(rest);
        }
        Err(errors)
    }

    /// Check every field, collecting all failures rather than stopping at the first
    pub fn validate(self) -> Result<NewTimer, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", "Timer name is required");
        }
        let category = self.category.trim();
        if category.is_empty() {
            errors.add("category", "Category is required");
        }
        if self.duration <= 0 {
            errors.add("duration", "Duration must be a positive number");
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(NewTimer {
            name: name.to_string(),
            category: category.to_string(),
            duration: self.duration as u64,
            halfway_alert: self.halfway_alert,
        })
    }
}

fn text_field(
    value: Option<&Value>,
    field: &'static str,
    wrong_type: &str,
    errors: &mut ValidationErrors,
) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(_) => {
            errors.add(field, wrong_type);
            String::new()
        }
    }
}
