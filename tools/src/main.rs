//! shuffle-runner: headless supply shuffler.
//!
//! Usage:
//!   shuffle-runner --seed 12345 --db picker.db --data-dir ./data
//!   shuffle-runner --seed 12345 --json
//!   shuffle-runner --db picker.db --history 5
//!   shuffle-runner --pref limit_supply=8 --pref req_cards=30,4
//!
//! Any --pref flag replaces data/shuffle_config.json with a config built
//! from the given preference keys.

use anyhow::Result;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use supply_core::{
    config::{load_catalog, ShuffleConfig},
    notify::Broadcaster,
    outcome::{OutcomeNotice, ShuffleOutcome},
    rng::ShuffleRng,
    store::{HistoryRecord, SupplyStore},
    worker::spawn_shuffle,
};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", ShuffleRng::from_entropy().seed());
    let history = parse_arg(&args, "--history", 0usize);
    let timeout_ms = parse_arg(&args, "--timeout-ms", 5_000u64);
    let json = args.iter().any(|a| a == "--json");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");

    let mut store = SupplyStore::open(db)?;
    store.migrate()?;

    if history > 0 {
        for record in store.recent_history(history)? {
            print_supply(&store, &record)?;
            println!();
        }
        return Ok(());
    }

    if store.card_count()? == 0 {
        let catalog = load_catalog(data_dir)?;
        let imported = store.import_cards(&catalog)?;
        log::info!("imported {imported} cards from {data_dir}");
    }

    let prefs = parse_prefs(&args);
    let config = if !prefs.is_empty() {
        ShuffleConfig::from_prefs(&prefs)
    } else {
        match ShuffleConfig::load(data_dir) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("{e}; using default shuffle config");
                ShuffleConfig::default()
            }
        }
    };

    if !json {
        println!("shuffle-runner");
        println!("  seed:      {seed}");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!("  kingdom:   {}", config.kingdom_size);
        println!("  specials:  {}", config.max_specials);
        println!();
    }

    let hub = Arc::new(Broadcaster::new());
    let notices = hub.subscribe();
    let handle = spawn_shuffle(config, store, Arc::clone(&hub), seed)?;

    let notice = match notices.recv_timeout(Duration::from_millis(timeout_ms)) {
        Ok(n) => Some(n),
        Err(_) => {
            log::warn!("no outcome after {timeout_ms}ms, cancelling");
            handle.cancel();
            None
        }
    };
    // The hub keeps its own sender alive, so never block on it after the
    // worker is gone.
    let finished = handle.join()?;
    let notice: Option<OutcomeNotice> = notice.or_else(|| notices.try_recv().ok());
    let Some(notice) = notice else {
        finished.outcome?;
        anyhow::bail!("shuffle worker exited without an outcome");
    };

    if json {
        println!("{}", serde_json::to_string(&notice)?);
        finished.outcome?;
        return Ok(());
    }

    println!("=== OUTCOME ===");
    println!("  attempt:   {}", notice.attempt_id);
    match &notice.outcome {
        ShuffleOutcome::Success { supply_id } => {
            let record = finished
                .store
                .history_record(*supply_id)?
                .ok_or_else(|| anyhow::anyhow!("supply {supply_id} missing from history"))?;
            println!("  result:    success");
            println!();
            print_supply(&finished.store, &record)?;
        }
        ShuffleOutcome::NoPairAvailable => {
            println!("  result:    failed, no bane available for the Young Witch");
        }
        ShuffleOutcome::InsufficientCandidates { shortfall } => {
            println!("  result:    failed, not enough kingdom cards ({shortfall})");
        }
        ShuffleOutcome::Cancelled => {
            println!("  result:    cancelled");
        }
        ShuffleOutcome::Aborted { reason } => {
            println!("  result:    aborted, {reason}");
        }
    }
    finished.outcome?;
    Ok(())
}

fn print_supply(store: &SupplyStore, record: &HistoryRecord) -> Result<()> {
    println!("=== SUPPLY {} ===", record.id);
    if let Some(name) = &record.name {
        println!("  name:      {name}");
    }
    for id in &record.cards {
        let label = match store.card(*id)? {
            Some(card) if card.event => format!("{} (event)", card.name),
            Some(card) if card.landmark => format!("{} (landmark)", card.name),
            Some(card) => format!("{} [{}]", card.name, card.cost),
            None => format!("#{id}"),
        };
        let bane = if record.bane == Some(*id) { "  <- bane" } else { "" };
        println!("  {label}{bane}");
    }
    println!("  high cost: {}", record.high_cost);
    println!("  shelters:  {}", record.shelters);
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

/// Every `--pref key=value` pair on the command line.
fn parse_prefs(args: &[String]) -> HashMap<String, String> {
    args.windows(2)
        .filter(|w| w[0] == "--pref")
        .filter_map(|w| w[1].split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .collect()
}
