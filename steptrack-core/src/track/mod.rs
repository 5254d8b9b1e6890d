//! Step recording and flattening.
//!
//! A track is an ordered list of steps captured inside one logical operation.
//! When the track is finalized, every step is flattened into a single record:
//!
//! ```text
//! Session (one per track name per execution context)
//!   ├── track_id, origin caller, start time
//!   └── steps: Vec<Step>
//!         ├── step_name (becomes the flattened prefix)
//!         ├── split, duration, timestamp, caller
//!         └── payload fields
//!
//! Record (flat, handed to the finalize callback)
//!   ├── step_count, caller, duration, timestamp, track_id, final_step_name
//!   ├── step_<name>_i, step_<name>_split, step_<name>_<payload key>, ...
//!   └── step_<name>_1_i, ...                 (second step with the same name)
//! ```
//!
//! `partition_into` reverses the naming scheme for one step name. Both sides
//! go through [`naming`] so the prefixes they produce and parse cannot drift.

pub mod finalize;
pub mod naming;
pub mod partition;
pub mod recorder;
pub mod session;
pub mod step;

pub use partition::partition_into;
pub use session::{Callback, Session};
pub use step::Step;

/// Flat result mapping handed to the finalize callback.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Caller-supplied step data. Insertion order is kept.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Reserved field names written by the recorder and finalizer.
pub mod fields {
    pub const STEP_NAME: &str = "step_name";
    pub const INDEX: &str = "i";
    pub const SPLIT: &str = "split";
    pub const DURATION: &str = "duration";
    pub const TIMESTAMP: &str = "timestamp";
    pub const CALLER: &str = "caller";

    pub const STEP_COUNT: &str = "step_count";
    pub const TRACK_ID: &str = "track_id";
    pub const FINAL_STEP_NAME: &str = "final_step_name";
}
