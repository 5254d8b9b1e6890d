//! Finalizer: flattens a session into one record.

use serde_json::Value;

use super::fields::{CALLER, DURATION, FINAL_STEP_NAME, INDEX, STEP_COUNT, TIMESTAMP, TRACK_ID};
use super::naming::{flat_key, NameAllocator};
use super::session::Session;
use super::step::{render_timestamp, seconds};
use super::Record;

impl Session {
    /// Index of the step that names the whole track: the first step carrying
    /// the error key, else the last step.
    fn representative_step(&self) -> Option<usize> {
        self.steps
            .iter()
            .position(|step| step.fields.contains_key(&self.error_key))
            .or_else(|| self.steps.len().checked_sub(1))
    }

    /// Consume the session and build its flat record.
    pub(crate) fn flatten(self) -> Record {
        let mut result = Record::new();
        result.insert(STEP_COUNT.into(), Value::from(self.steps.len()));
        result.insert(CALLER.into(), Value::from(self.origin_caller.clone()));
        result.insert(DURATION.into(), seconds(self.started.elapsed()));
        result.insert(TIMESTAMP.into(), Value::from(render_timestamp(&self.started_at)));
        result.insert(TRACK_ID.into(), Value::from(self.track_id.clone()));

        if let Some(index) = self.representative_step() {
            result.insert(
                FINAL_STEP_NAME.into(),
                Value::from(self.steps[index].name.clone()),
            );
        }

        let mut names = NameAllocator::new();
        for (position, step) in self.steps.into_iter().enumerate() {
            let resolved = names.assign(&step.name);
            result.insert(flat_key(&resolved, INDEX), Value::from(position + 1));
            for (field, value) in step.fields {
                if field == INDEX {
                    continue;
                }
                result.insert(flat_key(&resolved, &field), value);
            }
        }

        result
    }
}
