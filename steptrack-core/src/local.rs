//! Thread-local tracks for call sites that cannot pass a [`Tracker`] around.
//!
//! Every OS thread owns its own set of tracks; the same track name on two
//! threads refers to two unrelated sessions. Callbacks run after the
//! thread's store has been released, so a callback may itself open, push to
//! or finish other tracks. The same holds for the closure given to
//! [`with_session`].
//!
//! The store holds callbacks of any return type. `done::<R>` must name the
//! type the track's callback returns; asking for another type fails with
//! [`TrackError::ResultType`] after the callback has run.
//!
//! ```
//! use serde_json::json;
//! use steptrack_core::{local, Record};
//!
//! local::start("request", |record: Record| record).unwrap();
//! local::push("request", "auth", Default::default()).unwrap();
//! let record: Record = local::done("request").unwrap();
//! assert_eq!(record["final_step_name"], json!("auth"));
//! ```
//!
//! [`Tracker`]: crate::Tracker

use std::any::{type_name, Any};
use std::cell::RefCell;
use std::panic::Location;

use crate::config::TrackConfig;
use crate::error::{Result, TrackError};
use crate::track::{Callback, Payload, Record, Session};
use crate::tracker::Tracker;

type Erased = Box<dyn Any>;

thread_local! {
    static TRACKS: RefCell<Tracker<Erased>> = RefCell::new(Tracker::new());
}

fn with_tracker<T>(f: impl FnOnce(&mut Tracker<Erased>) -> T) -> T {
    TRACKS.with(|tracks| f(&mut tracks.borrow_mut()))
}

/// Open `track` on this thread. See [`Tracker::init`].
#[track_caller]
pub fn init<R: 'static>(
    track: &str,
    config: TrackConfig,
    callback: Option<Callback<R>>,
) -> Result<()> {
    let site = Location::caller();
    let caller = config.caller.clone().unwrap_or_else(|| site.to_string());
    let config = config.with_caller(caller);
    let erased: Option<Callback<Erased>> = callback.map(|callback| -> Callback<Erased> {
        Box::new(move |record: Record| Box::new(callback(record)) as Erased)
    });
    with_tracker(|tracker| tracker.init(track, config, erased))
}

#[track_caller]
pub fn start<R, F>(track: &str, callback: F) -> Result<()>
where
    R: 'static,
    F: FnOnce(Record) -> R + Send + 'static,
{
    init(track, TrackConfig::default(), Some(Box::new(callback)))
}

#[track_caller]
pub fn start_with<R, F>(track: &str, config: TrackConfig, callback: F) -> Result<()>
where
    R: 'static,
    F: FnOnce(Record) -> R + Send + 'static,
{
    init(track, config, Some(Box::new(callback)))
}

/// Record a step on this thread's `track`.
#[track_caller]
pub fn push(track: &str, name: impl Into<String>, payload: Payload) -> Result<()> {
    let caller = Location::caller();
    let name = name.into();
    with_tracker(|tracker| {
        let active = tracker.active_mut(track)?;
        active.session.record(name, payload, caller);
        Ok(())
    })
}

/// Close this thread's `track` and return its callback's value.
pub fn done<R: 'static>(track: &str) -> Result<R> {
    let active = with_tracker(|tracker| tracker.remove(track))?;
    let value = active.finish(track);
    value
        .downcast::<R>()
        .map(|value| *value)
        .map_err(|_| TrackError::ResultType {
            track: track.to_string(),
            expected: type_name::<R>(),
        })
}

pub fn track_id(track: &str) -> Result<String> {
    with_tracker(|tracker| tracker.track_id(track).map(str::to_string))
}

pub fn is_active(track: &str) -> bool {
    with_tracker(|tracker| tracker.is_active(track))
}

/// Inspect this thread's `track` without closing it.
///
/// `f` sees a snapshot taken before it runs, with the store released, so it
/// may push to the same track. Those pushes do not show in the snapshot.
pub fn with_session<T>(track: &str, f: impl FnOnce(&Session) -> T) -> Result<T> {
    let session = with_tracker(|tracker| tracker.session(track).cloned())?;
    Ok(f(&session))
}
