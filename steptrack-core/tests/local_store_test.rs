//! Thread-local facade: isolation between threads and parity with Tracker

mod common;

use common::{init_test_logging, payload};
use serde_json::json;
use std::thread;
use steptrack_core::{local, Payload, Record, TrackConfig, TrackError};

#[test]
fn test_same_track_name_on_many_threads() {
    init_test_logging();

    let handles: Vec<_> = (0..4)
        .map(|n| {
            thread::spawn(move || {
                let config = TrackConfig::default().with_track_id(format!("worker-{n}"));
                local::start_with("job", config, |record: Record| record).unwrap();
                for step in 0..=n {
                    local::push("job", format!("step{step}"), Payload::new()).unwrap();
                }
                local::done::<Record>("job").unwrap()
            })
        })
        .collect();

    for (n, handle) in handles.into_iter().enumerate() {
        let record = handle.join().unwrap();
        assert_eq!(record["track_id"], json!(format!("worker-{n}")));
        assert_eq!(record["step_count"], json!(n + 1));
    }
}

#[test]
fn test_uninitialized_track() {
    init_test_logging();

    assert!(matches!(
        local::push("local_never", "a", Payload::new()),
        Err(TrackError::NotInitialized { .. })
    ));
    assert!(matches!(
        local::done::<Record>("local_never"),
        Err(TrackError::NotInitialized { .. })
    ));
    assert!(matches!(
        local::track_id("local_never"),
        Err(TrackError::NotInitialized { .. })
    ));
}

#[test]
fn test_track_id_default_and_configured() {
    init_test_logging();

    local::start("local_default_id", |record: Record| record).unwrap();
    assert_eq!(
        local::track_id("local_default_id").unwrap(),
        format!("{:?}", thread::current().id())
    );
    let _: Record = local::done("local_default_id").unwrap();

    let config = TrackConfig::default().with_track_id("moobar");
    local::start_with("local_fixed_id", config, |record: Record| record).unwrap();
    assert_eq!(local::track_id("local_fixed_id").unwrap(), "moobar");
    let _: Record = local::done("local_fixed_id").unwrap();
}

#[test]
fn test_caller_is_test_file() {
    init_test_logging();

    local::start("local_site", |record: Record| record).unwrap();
    local::push("local_site", "a", payload(json!({"k": "v"}))).unwrap();
    let record: Record = local::done("local_site").unwrap();

    assert!(record["caller"].as_str().unwrap().contains("local_store_test.rs"));
    assert!(record["step_a_caller"]
        .as_str()
        .unwrap()
        .contains("local_store_test.rs"));
}
