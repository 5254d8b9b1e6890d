//! Step recorder: appends a step or folds it into the previous one.

use chrono::Local;
use serde_json::Value;
use std::panic::Location;
use std::time::Instant;
use tracing::trace;

use super::fields::{CALLER, DURATION, SPLIT, STEP_NAME, TIMESTAMP};
use super::session::Session;
use super::step::{render_timestamp, seconds, Step};
use super::Payload;

/// Truthiness of a control value: everything except `null` and `false`.
fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

fn name_from_value(value: Value) -> String {
    match value {
        Value::String(name) => name,
        other => other.to_string(),
    }
}

impl Session {
    /// Record a step.
    ///
    /// With a truthy merge key in `payload`, the latest step is popped and
    /// becomes the base of the new one. Timings are still measured against
    /// the step before it, and the base keeps its name and caller.
    pub(crate) fn record(&mut self, name: String, mut payload: Payload, caller: &Location<'_>) {
        let now = Instant::now();
        let now_at = Local::now();

        let merging = payload
            .shift_remove(&self.merge_key)
            .is_some_and(|value| is_truthy(&value));
        let base = if merging { self.steps.pop() } else { None };

        let baseline = self.steps.last().map_or(self.started, |step| step.captured);
        let split = now.saturating_duration_since(baseline);
        let duration = now.saturating_duration_since(self.started);

        let (mut fields, frozen) = match base {
            Some(step) => {
                let inherited_caller = step.fields.get(CALLER).cloned();
                (step.fields, Some((step.name, inherited_caller)))
            }
            None => (Payload::new(), None),
        };

        fields.insert(SPLIT.into(), seconds(split));
        fields.insert(DURATION.into(), seconds(duration));
        fields.insert(TIMESTAMP.into(), Value::from(render_timestamp(&now_at)));
        let caller_value = frozen
            .as_ref()
            .and_then(|(_, inherited)| inherited.clone())
            .unwrap_or_else(|| Value::from(caller.to_string()));
        fields.insert(CALLER.into(), caller_value.clone());

        let payload_name = payload.shift_remove(STEP_NAME);
        fields.extend(payload);

        let (step_name, merged) = match frozen {
            Some((base_name, _)) => {
                fields.insert(CALLER.into(), caller_value);
                (base_name, true)
            }
            None => (payload_name.map(name_from_value).unwrap_or(name), false),
        };

        trace!(
            step = %step_name,
            merged,
            split_secs = split.as_secs_f64(),
            "recorded step"
        );

        self.steps.push(Step {
            name: step_name,
            fields,
            captured: now,
        });
    }
}
