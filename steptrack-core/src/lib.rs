//! Step-level timing recorder.
//!
//! Application code opens a track for one logical operation, pushes named
//! steps as it goes, and finishes the track. Finishing flattens every step
//! into one record of `step_<name>_<field>` keys plus a few summary fields,
//! and hands that record to the callback given when the track was opened.
//!
//! ```
//! use serde_json::json;
//! use steptrack_core::{Payload, Record, Tracker};
//!
//! let mut tracker: Tracker = Tracker::new();
//! tracker.start("request", |record: Record| record).unwrap();
//!
//! let mut rows = Payload::new();
//! rows.insert("rows".into(), json!(12));
//! tracker.push("request", "query", rows).unwrap();
//! tracker.push("request", "render", Payload::new()).unwrap();
//!
//! let record = tracker.done("request").unwrap();
//! assert_eq!(record["step_count"], json!(2));
//! assert_eq!(record["final_step_name"], json!("render"));
//! assert_eq!(record["step_query_rows"], json!(12));
//! ```

pub mod config;
pub mod emit;
pub mod error;
pub mod local;
pub mod track;
pub mod tracker;

pub use config::TrackConfig;
pub use error::{Result, TrackError};
pub use track::{partition_into, Callback, Payload, Record, Session, Step};
pub use tracker::Tracker;
