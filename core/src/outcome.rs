//! Terminal outcomes and the reporter that persists and announces them.
//!
//! RULE: Every attempt ends in exactly one ShuffleOutcome, delivered once.
//! Outcomes are values. A storage failure is also returned as an error to
//! the caller, but listeners still hear about it as Aborted.

use crate::{
    error::ShuffleResult,
    notify::OutcomeNotifier,
    supply::SupplyState,
    types::{CardId, SupplyId, NO_BANE},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the shuffler stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShufflePhase {
    Init,
    LoadingRequired,
    LoadingOptional,
    Succeeded,
    FailedNoPair,
    FailedShortage,
    Cancelled,
}

impl ShufflePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::FailedNoPair | Self::FailedShortage | Self::Cancelled
        )
    }
}

/// Kingdom cards obtained versus required. Displays as "8/10".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub obtained: usize,
    pub required: usize,
}

impl Shortfall {
    pub fn of(supply: &SupplyState) -> Self {
        Self {
            obtained: supply.kingdom().len(),
            required: supply.min_kingdom(),
        }
    }
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.obtained, self.required)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShuffleOutcome {
    Success { supply_id: SupplyId },
    /// One slot short and the Young Witch still waits for a bane.
    NoPairAvailable,
    InsufficientCandidates { shortfall: String },
    Cancelled,
    /// The card table or history could not be read or written.
    Aborted { reason: String },
}

/// What listeners receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeNotice {
    pub attempt_id: String,
    pub outcome:    ShuffleOutcome,
}

/// A supply about to be written to history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHistory {
    pub name:      Option<String>,
    /// Milliseconds since the Unix epoch.
    pub time:      i64,
    /// Comma-joined card ids, kingdom first.
    pub cards:     String,
    /// Bane card id, or NO_BANE.
    pub bane:      CardId,
    pub high_cost: bool,
    pub shelters:  bool,
}

impl NewHistory {
    pub fn from_supply(supply: &SupplyState, time: i64) -> Self {
        Self {
            name: None,
            time,
            cards: supply
                .cards()
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(","),
            bane: supply.resolved_bane().unwrap_or(NO_BANE),
            high_cost: supply.high_cost(),
            shelters: supply.shelters(),
        }
    }
}

/// Durable record of successful shuffles.
pub trait HistorySink {
    /// Store the supply and return its id. Ids strictly increase.
    fn record(&self, entry: &NewHistory) -> ShuffleResult<SupplyId>;
}

pub struct ResultReporter<'a> {
    attempt_id: &'a str,
    notifier:   &'a dyn OutcomeNotifier,
}

impl<'a> ResultReporter<'a> {
    pub fn new(attempt_id: &'a str, notifier: &'a dyn OutcomeNotifier) -> Self {
        Self { attempt_id, notifier }
    }

    /// Turn a terminal phase into an outcome, persist it on success, and
    /// deliver it.
    pub fn report(
        &self,
        phase:   ShufflePhase,
        supply:  &SupplyState,
        history: &dyn HistorySink,
    ) -> ShuffleResult<ShuffleOutcome> {
        assert!(phase.is_terminal(), "report() called with {phase:?}");

        let outcome = match phase {
            ShufflePhase::Succeeded => {
                let entry = NewHistory::from_supply(supply, chrono::Utc::now().timestamp_millis());
                let supply_id = history.record(&entry)?;
                ShuffleOutcome::Success { supply_id }
            }
            ShufflePhase::FailedNoPair => ShuffleOutcome::NoPairAvailable,
            ShufflePhase::FailedShortage => ShuffleOutcome::InsufficientCandidates {
                shortfall: Shortfall::of(supply).to_string(),
            },
            _ => ShuffleOutcome::Cancelled,
        };

        log::info!("attempt {}: {:?}", self.attempt_id, outcome);
        self.notifier.deliver(&OutcomeNotice {
            attempt_id: self.attempt_id.to_string(),
            outcome:    outcome.clone(),
        });
        Ok(outcome)
    }
}
