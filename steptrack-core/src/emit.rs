//! Ready-made finalize callbacks.
//!
//! Hosting applications usually forward the flat record to their log
//! pipeline. These helpers cover the two common shapes: a structured
//! `tracing` event, and a JSON line for file or stdout shipping.

use tracing::info;

use crate::error::Result;
use crate::track::fields::{FINAL_STEP_NAME, STEP_COUNT, TRACK_ID};
use crate::track::Record;

/// Serialize a record as one newline-terminated JSON object.
pub fn to_json_line(record: &Record) -> Result<String> {
    Ok(format!("{}\n", serde_json::to_string(record)?))
}

/// Emit `record` as a single `info` event on the `steptrack` target and
/// hand it back, so it can be used directly as a callback.
pub fn log_record(record: Record) -> Record {
    let track_id = record.get(TRACK_ID).and_then(|v| v.as_str()).unwrap_or_default();
    let final_step = record
        .get(FINAL_STEP_NAME)
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    let step_count = record.get(STEP_COUNT).and_then(|v| v.as_u64()).unwrap_or(0);
    let fields = serde_json::Value::Object(record.clone());

    info!(
        target: "steptrack",
        track_id = %track_id,
        final_step = %final_step,
        step_count,
        record = %fields,
        "track finished"
    );
    record
}
