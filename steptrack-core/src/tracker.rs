//! Tracker - explicit store of active tracks for one execution unit.
//!
//! Owned by whoever runs the logical operation (a request handler, a job
//! runner) and passed down by `&mut`. Nothing is shared between trackers,
//! so two units recording the same track name never see each other.
//!
//! ## Lifecycle
//!
//! 1. `init()` / `start()` opens a track, replacing any track of that name
//! 2. `push()` records steps
//! 3. `done()` removes the track, flattens it and returns the callback's value
//!
//! Dropping a tracker with open tracks logs them as abandoned; their
//! callbacks never run.

use std::collections::HashMap;
use std::panic::Location;
use tracing::{debug, warn};

use crate::config::TrackConfig;
use crate::error::{Result, TrackError};
use crate::track::{Callback, Payload, Record, Session};

/// An open track: its session and the callback that consumes it.
pub(crate) struct Active<R> {
    pub(crate) session: Session,
    pub(crate) callback: Callback<R>,
}

impl<R> Active<R> {
    /// Flatten the session and hand the record to the callback.
    pub(crate) fn finish(self, track: &str) -> R {
        let Active { session, callback } = self;
        let track_id = session.track_id.clone();
        let record = session.flatten();
        debug!(
            track = %track,
            track_id = %track_id,
            step_count = record.get(crate::track::fields::STEP_COUNT).and_then(|v| v.as_u64()),
            "finalized track"
        );
        callback(record)
    }
}

/// Active tracks keyed by name. `R` is what finalize callbacks return.
pub struct Tracker<R = Record> {
    tracks: HashMap<String, Active<R>>,
}

impl<R> Default for Tracker<R> {
    fn default() -> Self {
        Self {
            tracks: HashMap::new(),
        }
    }
}

impl<R> std::fmt::Debug for Tracker<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("tracks", &self.active_tracks())
            .finish()
    }
}

impl<R> Tracker<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `track`. Fails with a configuration error when `callback` is
    /// `None` or the config is invalid.
    ///
    /// The origin caller is the location of this call unless the config
    /// provides one.
    #[track_caller]
    pub fn init(
        &mut self,
        track: &str,
        config: TrackConfig,
        callback: Option<Callback<R>>,
    ) -> Result<()> {
        let caller = Location::caller();
        let callback = callback.ok_or_else(|| {
            TrackError::Configuration(format!("callback required to initialize track '{track}'"))
        })?;
        config.validate()?;

        let session = Session::new(config, caller);
        debug!(track = %track, track_id = %session.track_id, "initialized track");

        if let Some(previous) = self
            .tracks
            .insert(track.to_string(), Active { session, callback })
        {
            warn!(
                track = %track,
                steps = previous.session.steps.len(),
                "replaced track that was never finalized"
            );
        }
        Ok(())
    }

    /// Open `track` with the default configuration.
    #[track_caller]
    pub fn start<F>(&mut self, track: &str, callback: F) -> Result<()>
    where
        F: FnOnce(Record) -> R + Send + 'static,
    {
        self.init(track, TrackConfig::default(), Some(Box::new(callback)))
    }

    #[track_caller]
    pub fn start_with<F>(&mut self, track: &str, config: TrackConfig, callback: F) -> Result<()>
    where
        F: FnOnce(Record) -> R + Send + 'static,
    {
        self.init(track, config, Some(Box::new(callback)))
    }

    /// Record a step on `track`. The call site becomes the step's caller.
    #[track_caller]
    pub fn push(&mut self, track: &str, name: impl Into<String>, payload: Payload) -> Result<()> {
        let caller = Location::caller();
        let active = self.active_mut(track)?;
        active.session.record(name.into(), payload, caller);
        Ok(())
    }

    /// Close `track` and return whatever its callback returns.
    ///
    /// The track is gone before the callback runs, so a panicking or failing
    /// callback still leaves it closed.
    pub fn done(&mut self, track: &str) -> Result<R> {
        let active = self.remove(track)?;
        Ok(active.finish(track))
    }

    pub fn track_id(&self, track: &str) -> Result<&str> {
        self.session(track).map(Session::track_id)
    }

    /// Read-only view of an open track.
    pub fn session(&self, track: &str) -> Result<&Session> {
        self.tracks
            .get(track)
            .map(|active| &active.session)
            .ok_or_else(|| TrackError::not_initialized(track))
    }

    pub fn is_active(&self, track: &str) -> bool {
        self.tracks.contains_key(track)
    }

    /// Names of all open tracks, sorted.
    pub fn active_tracks(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tracks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub(crate) fn active_mut(&mut self, track: &str) -> Result<&mut Active<R>> {
        self.tracks
            .get_mut(track)
            .ok_or_else(|| TrackError::not_initialized(track))
    }

    pub(crate) fn remove(&mut self, track: &str) -> Result<Active<R>> {
        self.tracks
            .remove(track)
            .ok_or_else(|| TrackError::not_initialized(track))
    }
}

impl<R> Drop for Tracker<R> {
    fn drop(&mut self) {
        for (track, active) in &self.tracks {
            warn!(
                track = %track,
                track_id = %active.session.track_id,
                steps = active.session.steps.len(),
                "track dropped without being finalized"
            );
        }
    }
}
