//! Supply shuffler core.
//!
//! Builds a random Dominion supply from a card table, honouring the
//! required/excluded lists, the special card cap and the Young Witch's
//! bane, then records the result and announces it.

pub mod candidate;
pub mod config;
pub mod error;
pub mod filter;
pub mod notify;
pub mod outcome;
pub mod rng;
pub mod shuffler;
pub mod store;
pub mod supply;
pub mod types;
pub mod worker;
