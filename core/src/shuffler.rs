//! The shuffler: builds one supply from the card table.
//!
//! PASS ORDER (fixed):
//!   1. Required pass: every card in the required list, admitted forced.
//!   2. Optional pass: everything else the filters allow, in random
//!      order, until the kingdom is full.
//!
//! RULES:
//!   - Cancellation is checked before each candidate and at each pass
//!     boundary, never in the middle of an admission.
//!   - The optional pass stops pulling as soon as the kingdom is full.
//!   - A run ends in exactly one terminal ShufflePhase.

use crate::{
    candidate::CardSource,
    config::ShuffleConfig,
    error::ShuffleResult,
    filter,
    notify::OutcomeNotifier,
    outcome::{HistorySink, OutcomeNotice, ResultReporter, ShuffleOutcome, ShufflePhase},
    rng::ShuffleRng,
    supply::SupplyState,
};
use tokio_util::sync::CancellationToken;

/// How a loading pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassEnd {
    Exhausted,
    Filled,
    Cancelled,
}

pub struct Shuffler {
    pub attempt_id: String,
    config:         ShuffleConfig,
    rng:            ShuffleRng,
    cancel:         CancellationToken,
    phase:          ShufflePhase,
}

impl Shuffler {
    pub fn new(attempt_id: String, config: ShuffleConfig, rng: ShuffleRng, cancel: CancellationToken) -> Self {
        Self {
            attempt_id,
            config,
            rng,
            cancel,
            phase: ShufflePhase::Init,
        }
    }

    pub fn phase(&self) -> ShufflePhase {
        self.phase
    }

    /// Build a supply, then persist and announce the outcome.
    ///
    /// A store failure is returned as Err. Listeners get an Aborted
    /// notice for it, so every attempt is announced exactly once.
    pub fn run(
        &mut self,
        source:   &dyn CardSource,
        history:  &dyn HistorySink,
        notifier: &dyn OutcomeNotifier,
    ) -> ShuffleResult<ShuffleOutcome> {
        let result = match self.build(source) {
            Ok(supply) => {
                ResultReporter::new(&self.attempt_id, notifier).report(self.phase, &supply, history)
            }
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            log::error!("attempt {} aborted in {:?}: {e}", self.attempt_id, self.phase);
            notifier.deliver(&OutcomeNotice {
                attempt_id: self.attempt_id.clone(),
                outcome:    ShuffleOutcome::Aborted { reason: e.to_string() },
            });
        }
        result
    }

    /// Drive both passes and leave the shuffler in a terminal phase.
    /// Returns the supply as it stood when the attempt ended.
    pub fn build(&mut self, source: &dyn CardSource) -> ShuffleResult<SupplyState> {
        assert_eq!(self.phase, ShufflePhase::Init, "a Shuffler runs once");
        log::debug!(
            "attempt {} seed={} kingdom={} specials={}",
            self.attempt_id,
            self.rng.seed(),
            self.config.kingdom_size,
            self.config.max_specials
        );

        let mut supply = SupplyState::new(
            self.config.kingdom_size,
            self.config.max_specials,
            self.config.rules.clone(),
            &mut self.rng,
        );
        if !supply.needs_kingdom() {
            self.enter(ShufflePhase::Succeeded);
            return Ok(supply);
        }
        if self.cancel.is_cancelled() {
            self.enter(ShufflePhase::Cancelled);
            return Ok(supply);
        }

        if let Some(required) = filter::id_in(&self.config.required_cards) {
            self.enter(ShufflePhase::LoadingRequired);
            let query = filter::join_filters([Some(self.config.base_filter.as_str()), Some(required.as_str())]);
            if self.load(source, &query, &mut supply, true)? == PassEnd::Cancelled {
                self.enter(ShufflePhase::Cancelled);
                return Ok(supply);
            }
        }
        if self.cancel.is_cancelled() {
            self.enter(ShufflePhase::Cancelled);
            return Ok(supply);
        }
        if !supply.needs_kingdom() {
            self.enter(ShufflePhase::Succeeded);
            return Ok(supply);
        }

        self.enter(ShufflePhase::LoadingOptional);
        let edition = self.config.edition_filter();
        let remainder = filter::remainder_filter(
            &self.config.required_cards,
            &self.config.excluded_cards,
            &edition,
        );
        let query = filter::join_filters([Some(self.config.base_filter.as_str()), Some(remainder.as_str())]);
        if self.load(source, &query, &mut supply, false)? == PassEnd::Cancelled
            || self.cancel.is_cancelled()
        {
            self.enter(ShufflePhase::Cancelled);
            return Ok(supply);
        }
        if !supply.needs_kingdom() {
            self.enter(ShufflePhase::Succeeded);
            return Ok(supply);
        }

        if supply.is_waiting_for_pair() && supply.shortfall() == 1 {
            self.enter(ShufflePhase::FailedNoPair);
        } else {
            self.enter(ShufflePhase::FailedShortage);
        }
        Ok(supply)
    }

    /// Pull candidates matching `query` into the supply. Forced passes
    /// drain the stream; optional passes stop once the kingdom is full.
    fn load(
        &mut self,
        source: &dyn CardSource,
        query:  &str,
        supply: &mut SupplyState,
        forced: bool,
    ) -> ShuffleResult<PassEnd> {
        let mut stream = source.query(query, &mut self.rng)?;
        let end = loop {
            if !forced && !supply.needs_kingdom() {
                break PassEnd::Filled;
            }
            if self.cancel.is_cancelled() {
                break PassEnd::Cancelled;
            }
            let Some(card) = stream.next() else {
                break PassEnd::Exhausted;
            };
            let card = card?;
            if card.special {
                supply.admit_special(card.id, forced);
            } else {
                supply.admit_kingdom(card.id, &card.cost, card.set_id, forced);
            }
        };

        log::debug!(
            "attempt {} pass forced={forced} filter={query:?}: {end:?} after {} card(s), kingdom {}/{}",
            self.attempt_id,
            stream.yielded(),
            supply.kingdom().len(),
            supply.min_kingdom()
        );
        Ok(end)
    }

    fn enter(&mut self, next: ShufflePhase) {
        assert!(!self.phase.is_terminal(), "left terminal phase {:?}", self.phase);
        log::debug!("attempt {}: {:?} -> {:?}", self.attempt_id, self.phase, next);
        self.phase = next;
    }
}
