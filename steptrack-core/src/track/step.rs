//! Step type and timing helpers.

use chrono::{DateTime, Local, SecondsFormat};
use serde_json::Value;
use std::time::{Duration, Instant};

use super::fields::{CALLER, DURATION, SPLIT, TIMESTAMP};
use super::Payload;

/// Render a wall-clock instant the way every record field carries it.
pub(crate) fn render_timestamp(at: &DateTime<Local>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Seconds as a JSON number.
pub(crate) fn seconds(elapsed: Duration) -> Value {
    Value::from(elapsed.as_secs_f64())
}

/// One recorded step.
///
/// The name is kept apart from the field map: it is the flattening prefix
/// and never appears as a flattened field itself.
#[derive(Debug, Clone)]
pub struct Step {
    pub(crate) name: String,

    /// split, duration, timestamp, caller, then payload keys
    pub(crate) fields: Payload,

    /// Monotonic capture time, baseline for the next step's split
    pub(crate) captured: Instant,
}

impl Step {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &Payload {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Seconds since the previous step (or session start).
    pub fn split(&self) -> Option<f64> {
        self.fields.get(SPLIT).and_then(Value::as_f64)
    }

    /// Seconds since session start.
    pub fn duration(&self) -> Option<f64> {
        self.fields.get(DURATION).and_then(Value::as_f64)
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.fields.get(TIMESTAMP).and_then(Value::as_str)
    }

    pub fn caller(&self) -> Option<&str> {
        self.fields.get(CALLER).and_then(Value::as_str)
    }
}
