//! Filter expressions over the card table.
//!
//! Filters are SQL boolean expressions. An empty string matches every
//! card, so joining nothing yields "".

use crate::types::{CardId, SetId};
use std::collections::BTreeMap;

pub const ID_COLUMN: &str = "_id";

/// Edition preference meaning "cards from every edition".
pub const ALL_EDITIONS: u32 = 0;

/// Join filters with AND, skipping missing and empty ones.
pub fn join_filters<'a, I>(filters: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    filters
        .into_iter()
        .flatten()
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn id_list(ids: &[CardId]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",")
}

/// `_id IN (..)`, or None for an empty list.
pub fn id_in(ids: &[CardId]) -> Option<String> {
    if ids.is_empty() {
        return None;
    }
    Some(format!("{ID_COLUMN} IN ({})", id_list(ids)))
}

/// `_id NOT IN (..)`, or None for an empty list.
pub fn id_not_in(ids: &[CardId]) -> Option<String> {
    if ids.is_empty() {
        return None;
    }
    Some(format!("{ID_COLUMN} NOT IN ({})", id_list(ids)))
}

/// Restrict each listed set to one edition. Cards with edition 0 are in
/// every edition of their set and always pass.
pub fn edition_filter(editions: &BTreeMap<SetId, u32>) -> String {
    let clauses: Vec<String> = editions
        .iter()
        .filter(|(_, edition)| **edition != ALL_EDITIONS)
        .map(|(set_id, edition)| format!("(set_id != {set_id} OR edition IN (0, {edition}))"))
        .collect();
    join_filters(clauses.iter().map(|c| Some(c.as_str())))
}

/// Everything the optional pass may draw from: not required, not
/// excluded, and in an allowed edition.
pub fn remainder_filter(required: &[CardId], excluded: &[CardId], edition: &str) -> String {
    let skipped: Vec<CardId> = required.iter().chain(excluded.iter()).copied().collect();
    let not_in = id_not_in(&skipped);
    join_filters([not_in.as_deref(), Some(edition)])
}
