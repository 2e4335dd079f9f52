//! Helpers shared by the integration tests.
#![allow(dead_code)]

use std::sync::mpsc;
use supply_core::{
    config::ShuffleConfig,
    outcome::{OutcomeNotice, ShuffleOutcome},
    rng::ShuffleRng,
    shuffler::Shuffler,
    store::{CardRow, HistoryRecord, SupplyStore},
    supply::YOUNG_WITCH,
    types::{CardId, SetId},
};
use tokio_util::sync::CancellationToken;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn kingdom(id: CardId, cost: &str, set_id: SetId) -> CardRow {
    CardRow {
        id,
        name: format!("card-{id}"),
        set_id,
        cost: cost.into(),
        debt: 0,
        event: false,
        landmark: false,
        edition: 0,
    }
}

pub fn event(id: CardId) -> CardRow {
    CardRow { event: true, cost: "0".into(), ..kingdom(id, "0", 7) }
}

pub fn young_witch() -> CardRow {
    CardRow { name: "Young Witch".into(), ..kingdom(YOUNG_WITCH, "4", 3) }
}

/// `n` cost-5 base set cards starting at `first`. None of them is a bane.
pub fn plain_cards(first: CardId, n: usize) -> Vec<CardRow> {
    (0..n as CardId).map(|i| kingdom(first + i, "5", 0)).collect()
}

pub fn store_with(cards: &[CardRow]) -> SupplyStore {
    init_logging();
    let mut store = SupplyStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store.import_cards(cards).expect("import cards");
    store
}

pub fn config(kingdom_size: usize, max_specials: usize) -> ShuffleConfig {
    ShuffleConfig {
        kingdom_size,
        max_specials,
        ..ShuffleConfig::default_test()
    }
}

/// Run one attempt synchronously, collecting every notice delivered.
pub fn run(
    store:  &SupplyStore,
    config: ShuffleConfig,
    seed:   u64,
) -> (ShuffleOutcome, Vec<OutcomeNotice>) {
    run_with_token(store, config, seed, CancellationToken::new())
}

pub fn run_with_token(
    store:  &SupplyStore,
    config: ShuffleConfig,
    seed:   u64,
    cancel: CancellationToken,
) -> (ShuffleOutcome, Vec<OutcomeNotice>) {
    let (tx, rx) = mpsc::channel();
    let mut shuffler = Shuffler::new(format!("test-{seed}"), config, ShuffleRng::new(seed), cancel);
    let outcome = shuffler.run(store, store, &tx).expect("shuffle");
    drop(tx);
    (outcome, rx.iter().collect())
}

/// The history record behind a successful outcome.
pub fn supply_of(store: &SupplyStore, outcome: &ShuffleOutcome) -> HistoryRecord {
    match outcome {
        ShuffleOutcome::Success { supply_id } => store
            .history_record(*supply_id)
            .expect("read history")
            .expect("history record exists"),
        other => panic!("expected success, got {other:?}"),
    }
}

/// Split a record's cards into (kingdom, specials) using the card table.
pub fn split_cards(store: &SupplyStore, record: &HistoryRecord) -> (Vec<CardId>, Vec<CardId>) {
    record.cards.iter().copied().partition(|id| {
        let card = store.card(*id).expect("read card").expect("card exists");
        !(card.event || card.landmark)
    })
}
