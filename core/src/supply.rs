//! The in-progress supply for one shuffle attempt.
//!
//! RULES:
//!   - Only the admission methods mutate a SupplyState.
//!   - The kingdom may only outgrow its target once, when the Young Witch
//!     is admitted and claims the extra slot for her bane.
//!   - The Young Witch is never admitted without a bane candidate already
//!     recorded. If she is drawn first she waits; the first bane-eligible
//!     card drawn afterwards pulls her in.
//!   - The high cost / shelters marker slots are drawn once at
//!     construction and never re-drawn, even after the Young Witch grows
//!     the kingdom.

use crate::{
    rng::ShuffleRng,
    types::{CardId, SetId},
};
use serde::{Deserialize, Serialize};

/// Card id of the Young Witch in the bundled card table.
pub const YOUNG_WITCH: CardId = 30;
/// Set id of Prosperity. Decides high cost games (Platinum/Colony).
pub const SET_PROSPERITY: SetId = 4;
/// Set id of Dark Ages. Decides whether shelters replace estates.
pub const SET_DARK_AGES: SetId = 6;

/// The card-specific constants the supply rules depend on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupplyRules {
    pub young_witch:    CardId,
    /// Costs that make a kingdom card a valid bane. Compared verbatim,
    /// so debt costs like "8D" never qualify.
    pub bane_costs:     Vec<String>,
    pub prosperity_set: SetId,
    pub dark_ages_set:  SetId,
}

impl Default for SupplyRules {
    fn default() -> Self {
        Self {
            young_witch:    YOUNG_WITCH,
            bane_costs:     vec!["2".into(), "3".into()],
            prosperity_set: SET_PROSPERITY,
            dark_ages_set:  SET_DARK_AGES,
        }
    }
}

impl SupplyRules {
    pub fn is_bane_cost(&self, cost: &str) -> bool {
        self.bane_costs.iter().any(|c| c == cost)
    }
}

/// A kingdom card that was drawn but could not be admitted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredCard {
    pub id:     CardId,
    pub set_id: SetId,
}

/// Resolution of the Young Witch / bane dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaneState {
    /// No Young Witch drawn.
    Inactive,
    /// Young Witch drawn, no bane candidate seen yet.
    Waiting(DeferredCard),
    /// Young Witch admitted together with a bane.
    Active,
}

#[derive(Debug, Clone)]
pub struct SupplyState {
    kingdom:        Vec<CardId>,
    specials:       Vec<CardId>,
    min_kingdom:    usize,
    max_specials:   usize,
    bane:           BaneState,
    bane_card:      Option<CardId>,
    high_cost_slot: usize,
    shelter_slot:   usize,
    high_cost:      bool,
    shelters:       bool,
    rules:          SupplyRules,
}

impl SupplyState {
    /// Fresh supply with both marker slots drawn uniformly from
    /// [1, min_kingdom].
    pub fn new(
        min_kingdom:  usize,
        max_specials: usize,
        rules:        SupplyRules,
        rng:          &mut ShuffleRng,
    ) -> Self {
        let high_cost_slot = rng.slot(min_kingdom);
        let shelter_slot = rng.slot(min_kingdom);
        Self::with_slots(min_kingdom, max_specials, rules, high_cost_slot, shelter_slot)
    }

    /// Fresh supply with explicit 1-indexed marker slots.
    pub fn with_slots(
        min_kingdom:    usize,
        max_specials:   usize,
        rules:          SupplyRules,
        high_cost_slot: usize,
        shelter_slot:   usize,
    ) -> Self {
        Self {
            kingdom: Vec::with_capacity(min_kingdom + 1),
            specials: Vec::with_capacity(max_specials),
            min_kingdom,
            max_specials,
            bane: BaneState::Inactive,
            bane_card: None,
            high_cost_slot,
            shelter_slot,
            high_cost: false,
            shelters: false,
            rules,
        }
    }

    /// Add an event or landmark. Optional specials are dropped once the cap
    /// is reached; required ones always go in.
    pub fn admit_special(&mut self, id: CardId, forced: bool) {
        if forced || self.specials.len() < self.max_specials {
            self.specials.push(id);
        }
    }

    /// Add a kingdom card, applying the Young Witch and bane rules.
    pub fn admit_kingdom(&mut self, id: CardId, cost: &str, set_id: SetId, forced: bool) {
        if !forced && !self.needs_kingdom() {
            return;
        }

        if id == self.rules.young_witch {
            if self.bane_card.is_none() {
                self.bane = BaneState::Waiting(DeferredCard { id, set_id });
                return;
            }
            self.activate_bane();
        } else if self.rules.is_bane_cost(cost) {
            self.bane_card = Some(id);
            // Two steps: leave Waiting, then admit the deferred witch ahead
            // of her bane.
            if let BaneState::Waiting(witch) = &self.bane {
                let witch = witch.clone();
                self.activate_bane();
                self.push_kingdom(witch.id, witch.set_id);
            }
        }

        self.push_kingdom(id, set_id);
    }

    fn activate_bane(&mut self) {
        self.bane = BaneState::Active;
        self.min_kingdom += 1;
    }

    fn push_kingdom(&mut self, id: CardId, set_id: SetId) {
        self.kingdom.push(id);
        let position = self.kingdom.len();
        if position == self.high_cost_slot {
            self.high_cost = set_id == self.rules.prosperity_set;
        }
        if position == self.shelter_slot {
            self.shelters = set_id == self.rules.dark_ages_set;
        }
    }

    pub fn needs_kingdom(&self) -> bool {
        self.kingdom.len() < self.min_kingdom
    }

    /// How many more kingdom cards the supply needs.
    pub fn shortfall(&self) -> usize {
        self.min_kingdom.saturating_sub(self.kingdom.len())
    }

    pub fn is_waiting_for_pair(&self) -> bool {
        matches!(self.bane, BaneState::Waiting(_))
    }

    /// The bane, but only once the Young Witch is actually in the supply.
    pub fn resolved_bane(&self) -> Option<CardId> {
        match self.bane {
            BaneState::Active => self.bane_card,
            _ => None,
        }
    }

    pub fn kingdom(&self) -> &[CardId] { &self.kingdom }
    pub fn specials(&self) -> &[CardId] { &self.specials }
    pub fn min_kingdom(&self) -> usize { self.min_kingdom }
    pub fn bane_state(&self) -> &BaneState { &self.bane }
    pub fn high_cost(&self) -> bool { self.high_cost }
    pub fn shelters(&self) -> bool { self.shelters }
    pub fn high_cost_slot(&self) -> usize { self.high_cost_slot }
    pub fn shelter_slot(&self) -> usize { self.shelter_slot }

    /// Every selected card: kingdom first, then specials.
    pub fn cards(&self) -> Vec<CardId> {
        self.kingdom.iter().chain(self.specials.iter()).copied().collect()
    }
}
