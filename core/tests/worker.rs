//! Attempts running on a worker thread.

mod common;

use common::*;
use std::sync::Arc;
use supply_core::{notify::Broadcaster, outcome::ShuffleOutcome, worker::spawn_shuffle};

#[test]
fn every_subscriber_gets_the_one_outcome() {
    let store = store_with(&plain_cards(100, 12));
    let hub = Arc::new(Broadcaster::new());
    let first = hub.subscribe();
    let second = hub.subscribe();

    let handle = spawn_shuffle(config(10, 2), store, Arc::clone(&hub), 77).unwrap();
    let attempt_id = handle.attempt_id.clone();
    let finished = handle.join().unwrap();
    let outcome = finished.outcome.unwrap();

    for rx in [&first, &second] {
        let notice = rx.recv().unwrap();
        assert_eq!(notice.attempt_id, attempt_id);
        assert_eq!(notice.outcome, outcome);
        assert!(rx.try_recv().is_err(), "more than one notice");
    }

    let ShuffleOutcome::Success { supply_id } = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    let record = finished.store.history_record(supply_id).unwrap().expect("record");
    assert_eq!(record.cards.len(), 10);
}

#[test]
fn cancelled_worker_writes_no_history() {
    let store = store_with(&plain_cards(100, 500));
    let hub = Arc::new(Broadcaster::new());
    let notices = hub.subscribe();

    let handle = spawn_shuffle(config(400, 2), store, Arc::clone(&hub), 5).unwrap();
    handle.cancel();
    let finished = handle.join().unwrap();
    let outcome = finished.outcome.unwrap();

    // The worker may have finished before it saw the flag.
    let expected_history = match outcome {
        ShuffleOutcome::Cancelled => 0,
        ShuffleOutcome::Success { .. } => 1,
        ref other => panic!("unexpected outcome {other:?}"),
    };
    assert_eq!(finished.store.history_count().unwrap(), expected_history);
    assert_eq!(notices.recv().unwrap().outcome, outcome);
    assert!(notices.try_recv().is_err());
}

#[test]
fn dropped_listener_does_not_affect_outcome() {
    let store = store_with(&plain_cards(100, 7));
    let hub = Arc::new(Broadcaster::new());
    drop(hub.subscribe());

    let handle = spawn_shuffle(config(10, 2), store, hub, 1).unwrap();
    let finished = handle.join().unwrap();
    assert_eq!(
        finished.outcome.unwrap(),
        ShuffleOutcome::InsufficientCandidates { shortfall: "7/10".into() }
    );
}
