//! Session state for one in-flight track.

use chrono::{DateTime, Local};
use std::panic::Location;
use std::thread;
use std::time::Instant;

use super::step::Step;
use super::Record;
use crate::config::TrackConfig;

/// Finalize callback. Runs exactly once, inside `done`.
pub type Callback<R> = Box<dyn FnOnce(Record) -> R + Send>;

/// Mutable record of one in-flight track.
///
/// Created by `init`, mutated by `push`, consumed by `done`.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) track_id: String,
    pub(crate) steps: Vec<Step>,
    pub(crate) started: Instant,
    pub(crate) started_at: DateTime<Local>,
    pub(crate) origin_caller: String,
    pub(crate) merge_key: String,
    pub(crate) error_key: String,
}

/// Identifier of the current execution unit.
fn current_thread_id() -> String {
    format!("{:?}", thread::current().id())
}

impl Session {
    /// Start a session now. `caller` is the `init` call site, used unless the
    /// config pins an origin caller.
    pub(crate) fn new(config: TrackConfig, caller: &Location<'_>) -> Self {
        let TrackConfig {
            merge_key,
            error_key,
            track_id,
            caller: configured_caller,
        } = config;

        Self {
            track_id: track_id.unwrap_or_else(current_thread_id),
            steps: Vec::new(),
            started: Instant::now(),
            started_at: Local::now(),
            origin_caller: configured_caller.unwrap_or_else(|| caller.to_string()),
            merge_key,
            error_key,
        }
    }

    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn origin_caller(&self) -> &str {
        &self.origin_caller
    }

    pub fn started_at(&self) -> &DateTime<Local> {
        &self.started_at
    }

    pub fn merge_key(&self) -> &str {
        &self.merge_key
    }

    pub fn error_key(&self) -> &str {
        &self.error_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_thread_id_and_call_site() {
        let session = Session::new(TrackConfig::default(), Location::caller());

        assert_eq!(session.track_id(), format!("{:?}", thread::current().id()));
        assert!(session.origin_caller().contains("session.rs"));
        assert!(session.steps().is_empty());
        assert_eq!(session.merge_key(), "merge");
        assert_eq!(session.error_key(), "error");
        assert!(*session.started_at() <= Local::now());
    }

    #[test]
    fn test_config_overrides_identity() {
        let config = TrackConfig::default()
            .with_track_id("1234")
            .with_caller("jobs/import.rs:10");
        let session = Session::new(config, Location::caller());

        assert_eq!(session.track_id(), "1234");
        assert_eq!(session.origin_caller(), "jobs/import.rs:10");
    }

    #[test]
    fn test_track_id_differs_per_thread() {
        let here = current_thread_id();
        let there = thread::spawn(current_thread_id).join().unwrap();
        assert_ne!(here, there);
    }
}
