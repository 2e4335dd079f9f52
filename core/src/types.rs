//! Shared primitive types used across the shuffler.

/// Row id of a card in the card table.
pub type CardId = i64;

/// Id of the expansion (set) a card was printed in.
pub type SetId = i64;

/// Id of a persisted history record. Derived from wall-clock milliseconds.
pub type SupplyId = i64;

/// Value written to the history table when a supply has no bane card.
pub const NO_BANE: CardId = -1;
