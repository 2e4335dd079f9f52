use crate::{
    filter,
    store::CardRow,
    supply::SupplyRules,
    types::{CardId, SetId},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_KINGDOM_SIZE: usize = 10;
pub const DEFAULT_MAX_SPECIALS: usize = 2;

// ── Preference keys ────────────────────────────────────────────────

pub const PREF_LIMIT_SUPPLY: &str = "limit_supply";
pub const PREF_LIMIT_EVENTS: &str = "limit_events";
pub const PREF_REQ_CARDS: &str = "req_cards";
pub const PREF_FILT_CARD: &str = "filt_card";
pub const PREF_FILT_PRE: &str = "filt_pre";
/// Comma-separated edition choice per set, indexed by set id.
pub const PREF_EXPANSION_EDITIONS: &str = "expansion_editions";

/// Everything one shuffle attempt reads at start-up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShuffleConfig {
    /// Kingdom cards a complete supply needs.
    #[serde(default = "default_kingdom_size")]
    pub kingdom_size:   usize,
    /// Events and landmarks allowed beyond the required ones.
    #[serde(default = "default_max_specials")]
    pub max_specials:   usize,
    /// Cards that must be in the supply.
    #[serde(default)]
    pub required_cards: Vec<CardId>,
    /// Cards that must never be drawn.
    #[serde(default)]
    pub excluded_cards: Vec<CardId>,
    /// Filter applied to both passes (language, deselected sets, ...).
    #[serde(default)]
    pub base_filter:    String,
    /// Edition choice per set. Missing sets and 0 allow every edition.
    #[serde(default)]
    pub editions:       BTreeMap<SetId, u32>,
    #[serde(default)]
    pub rules:          SupplyRules,
}

fn default_kingdom_size() -> usize { DEFAULT_KINGDOM_SIZE }
fn default_max_specials() -> usize { DEFAULT_MAX_SPECIALS }

impl Default for ShuffleConfig {
    fn default() -> Self {
        Self {
            kingdom_size:   DEFAULT_KINGDOM_SIZE,
            max_specials:   DEFAULT_MAX_SPECIALS,
            required_cards: Vec::new(),
            excluded_cards: Vec::new(),
            base_filter:    String::new(),
            editions:       BTreeMap::new(),
            rules:          SupplyRules::default(),
        }
    }
}

impl ShuffleConfig {
    /// Load from the data/ directory.
    /// In tests, use ShuffleConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/shuffle_config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: ShuffleConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    /// Build from a flat preference map. Unparsable values fall back to
    /// their defaults so the shuffler never sees malformed input.
    pub fn from_prefs(prefs: &HashMap<String, String>) -> Self {
        let defaults = Self::default();
        Self {
            kingdom_size:   pref_usize(prefs, PREF_LIMIT_SUPPLY, defaults.kingdom_size),
            max_specials:   pref_usize(prefs, PREF_LIMIT_EVENTS, defaults.max_specials),
            required_cards: pref_ids(prefs, PREF_REQ_CARDS),
            excluded_cards: pref_ids(prefs, PREF_FILT_CARD),
            base_filter:    prefs.get(PREF_FILT_PRE).cloned().unwrap_or_default(),
            editions:       pref_editions(prefs),
            rules:          defaults.rules,
        }
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self::default()
    }

    pub fn edition_filter(&self) -> String {
        filter::edition_filter(&self.editions)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CardCatalogFile {
    cards: Vec<CardRow>,
}

/// Read the card catalog from `{data_dir}/cards.json`.
pub fn load_catalog(data_dir: &str) -> anyhow::Result<Vec<CardRow>> {
    let path = format!("{data_dir}/cards.json");
    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
    let file: CardCatalogFile = serde_json::from_str(&content)?;
    Ok(file.cards)
}

fn pref_usize(prefs: &HashMap<String, String>, key: &str, default: usize) -> usize {
    match prefs.get(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("pref {key}={raw:?} is not a count, using {default}");
            default
        }),
    }
}

fn pref_ids(prefs: &HashMap<String, String>, key: &str) -> Vec<CardId> {
    let Some(raw) = prefs.get(key) else {
        return Vec::new();
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                log::warn!("pref {key}: skipping card id {s:?}");
                None
            }
        })
        .collect()
}

fn pref_editions(prefs: &HashMap<String, String>) -> BTreeMap<SetId, u32> {
    let Some(raw) = prefs.get(PREF_EXPANSION_EDITIONS) else {
        return BTreeMap::new();
    };
    raw.split(',')
        .enumerate()
        .map(|(set_id, value)| {
            // Unparsable entries mean first edition.
            let edition = value.trim().parse().unwrap_or_else(|_| {
                log::warn!("pref {PREF_EXPANSION_EDITIONS}: set {set_id} has {value:?}, using 1");
                1
            });
            (set_id as SetId, edition)
        })
        .collect()
}
