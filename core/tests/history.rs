//! History table behaviour.

mod common;

use common::*;
use supply_core::{
    error::ShuffleError,
    outcome::{NewHistory, ShuffleOutcome},
    types::NO_BANE,
};

fn entry(time: i64) -> NewHistory {
    NewHistory {
        name: None,
        time,
        cards: "1,2,3".into(),
        bane: NO_BANE,
        high_cost: false,
        shelters: true,
    }
}

#[test]
fn supply_ids_strictly_increase() {
    let store = store_with(&plain_cards(100, 12));
    let mut last = i64::MIN;
    for seed in 0..5 {
        let (outcome, _) = run(&store, config(10, 2), seed);
        let ShuffleOutcome::Success { supply_id } = outcome else {
            panic!("seed {seed}: {outcome:?}");
        };
        assert!(supply_id > last, "id {supply_id} not after {last}");
        last = supply_id;
    }
    assert_eq!(store.history_count().unwrap(), 5);
}

#[test]
fn same_millisecond_ids_are_bumped() {
    let store = store_with(&[]);
    let a = store.append_history(&entry(1_000)).unwrap();
    let b = store.append_history(&entry(1_000)).unwrap();
    let c = store.append_history(&entry(999)).unwrap();
    assert_eq!((a, b, c), (1_000, 1_001, 1_002));
}

#[test]
fn record_round_trips_fields() {
    let store = store_with(&[]);
    let id = store
        .append_history(&NewHistory { bane: 42, high_cost: true, ..entry(5_000) })
        .unwrap();

    let record = store.history_record(id).unwrap().expect("record");
    assert_eq!(record.cards, vec![1, 2, 3]);
    assert_eq!(record.bane, Some(42));
    assert!(record.high_cost);
    assert!(record.shelters);
    assert_eq!(record.name, None);
    assert_eq!(record.time, 5_000);

    let id = store.append_history(&entry(6_000)).unwrap();
    assert_eq!(store.history_record(id).unwrap().unwrap().bane, None);
}

#[test]
fn recent_history_is_newest_first() {
    let store = store_with(&[]);
    for t in [10, 20, 30] {
        store.append_history(&entry(t)).unwrap();
    }
    let ids: Vec<_> = store.recent_history(2).unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![30, 20]);
}

#[test]
fn supplies_can_be_named() {
    let store = store_with(&[]);
    let id = store.append_history(&entry(1)).unwrap();

    store.rename_history(id, Some("Friday night")).unwrap();
    assert_eq!(
        store.history_record(id).unwrap().unwrap().name.as_deref(),
        Some("Friday night")
    );

    store.rename_history(id, None).unwrap();
    assert_eq!(store.history_record(id).unwrap().unwrap().name, None);

    assert!(matches!(
        store.rename_history(id + 1, Some("nope")),
        Err(ShuffleError::HistoryNotFound { .. })
    ));
}

#[test]
fn missing_record_is_none() {
    let store = store_with(&[]);
    assert!(store.history_record(12345).unwrap().is_none());
}

#[test]
fn malformed_card_list_is_an_error() {
    let store = store_with(&[]);
    let id = store
        .append_history(&NewHistory { cards: "1,x,3".into(), ..entry(7_000) })
        .unwrap();
    assert!(matches!(store.history_record(id), Err(ShuffleError::Database(_))));
    assert!(store.recent_history(5).is_err());
}
