//! Reconstructor: pulls the steps of one name back out of a flat record.

use super::naming::{disambiguated, opens_other_step, run_start, step_prefix};
use super::Record;

/// Split `result` into the keys unrelated to `name` and one sub-record per
/// step flattened under `name` (or its suffixed duplicates `name_1`, ...).
///
/// Every flattened step is a run of keys opened by its index key:
/// `step_<name>_i` or `step_<name>_<n>_i`. The run continues while keys
/// carry that step's prefix and ends at the first key that does not. A key
/// such as `step_<name>_write_i` opens a run for the step `<name>_write`,
/// which stays in `remaining` with the rest of its keys. Keys under the
/// prefix that sit outside any run also stay in `remaining`.
///
/// Sub-records come back in the order their runs appear in `result`, with
/// field names stripped of the `step_<name>[_<n>]_` prefix.
///
/// ```
/// use serde_json::json;
/// use steptrack_core::partition_into;
///
/// let flat = json!({
///     "step_count": 2,
///     "step_fetch_i": 1, "step_fetch_rows": 10,
///     "step_fetch_1_i": 2, "step_fetch_1_rows": 4,
/// });
/// let (remaining, steps) = partition_into(flat.as_object().unwrap().clone(), "fetch");
///
/// assert_eq!(remaining.len(), 1);
/// assert_eq!(steps.len(), 2);
/// assert_eq!(steps[1]["rows"], json!(4));
/// ```
pub fn partition_into(result: Record, name: &str) -> (Record, Vec<Record>) {
    let base = step_prefix(name);
    let mut remaining = Record::new();
    let mut steps: Vec<Record> = Vec::new();
    // prefix of the run being collected
    let mut current: Option<String> = None;

    for (key, value) in result {
        match key.strip_prefix(&base) {
            Some(remainder) => {
                if let Some(ordinal) = run_start(remainder) {
                    current = Some(step_prefix(&disambiguated(name, ordinal)));
                    steps.push(Record::new());
                } else if opens_other_step(remainder) {
                    current = None;
                }
            }
            None => current = None,
        }

        let field = current
            .as_deref()
            .and_then(|prefix| key.strip_prefix(prefix))
            .map(str::to_string);
        match (field, steps.last_mut()) {
            (Some(field), Some(step)) => {
                step.insert(field, value);
            }
            _ => {
                current = None;
                remaining.insert(key, value);
            }
        }
    }

    steps.retain(|step| !step.is_empty());
    (remaining, steps)
}
