//! Shuffles against the bundled card catalog in data/.

mod common;

use common::*;
use supply_core::{
    config::{load_catalog, ShuffleConfig},
    outcome::ShuffleOutcome,
    store::SupplyStore,
    supply::{SupplyRules, YOUNG_WITCH},
};

const DATA_DIR: &str = "../data";

fn catalog_store() -> SupplyStore {
    let catalog = load_catalog(DATA_DIR).expect("bundled catalog");
    store_with(&catalog)
}

#[test]
fn bundled_catalog_loads() {
    let store = catalog_store();
    assert!(store.card_count().unwrap() > 50);
    let witch = store.card(YOUNG_WITCH).unwrap().expect("Young Witch in catalog");
    assert_eq!(witch.name, "Young Witch");
}

#[test]
fn bundled_config_loads() {
    let config = ShuffleConfig::load(DATA_DIR).expect("bundled config");
    assert_eq!(config.kingdom_size, 10);
    assert_eq!(config.rules, SupplyRules::default());
}

#[test]
fn catalog_supplies_hold_their_invariants() {
    let store = catalog_store();
    let config = ShuffleConfig::load(DATA_DIR).expect("bundled config");
    let rules = SupplyRules::default();

    for seed in 0..100 {
        let (outcome, _) = run(&store, config.clone(), seed);
        assert!(matches!(outcome, ShuffleOutcome::Success { .. }), "seed {seed}: {outcome:?}");
        let record = supply_of(&store, &outcome);
        let (kingdom, specials) = split_cards(&store, &record);

        assert!(specials.len() <= config.max_specials, "seed {seed}: {specials:?}");
        for id in &record.cards {
            let card = store.card(*id).unwrap().unwrap();
            // Base and Intrigue are pinned to second edition.
            assert_ne!(card.edition, 1, "seed {seed}: first edition card {}", card.name);
        }

        match record.bane {
            Some(bane) => {
                assert_eq!(kingdom.len(), 11, "seed {seed}");
                assert!(kingdom.contains(&YOUNG_WITCH) && kingdom.contains(&bane));
                let bane = store.card(bane).unwrap().unwrap();
                assert!(rules.is_bane_cost(&bane.cost), "seed {seed}: bad bane {}", bane.name);
            }
            None => {
                assert_eq!(kingdom.len(), 10, "seed {seed}");
                assert!(!kingdom.contains(&YOUNG_WITCH), "seed {seed}: witch without bane");
            }
        }
    }
}
