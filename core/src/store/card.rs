//! Card table: catalog import and the CardSource the shuffler draws from.

use super::SupplyStore;
use crate::{
    candidate::{CandidateRecord, CardSource, CandidateStream},
    error::ShuffleResult,
    rng::ShuffleRng,
    types::{CardId, SetId},
};
use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};

/// One card as stored in the card table and in catalog files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRow {
    pub id:       CardId,
    pub name:     String,
    pub set_id:   SetId,
    #[serde(default = "zero_cost")]
    pub cost:     String,
    #[serde(default)]
    pub debt:     i64,
    #[serde(default)]
    pub event:    bool,
    #[serde(default)]
    pub landmark: bool,
    #[serde(default)]
    pub edition:  u32,
}

fn zero_cost() -> String { "0".into() }

impl SupplyStore {
    // ── Card catalog ──────────────────────────────────────────────

    /// Load a whole catalog in one transaction. Returns the number of rows written.
    pub fn import_cards(&mut self, cards: &[CardRow]) -> ShuffleResult<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO card (_id, name, set_id, cost, debt, type_event, type_landmark, edition)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for card in cards {
                stmt.execute(params![
                    card.id,
                    card.name,
                    card.set_id,
                    card.cost,
                    card.debt,
                    card.event,
                    card.landmark,
                    card.edition,
                ])?;
            }
        }
        tx.commit()?;
        log::debug!("imported {} card(s)", cards.len());
        Ok(cards.len())
    }

    pub fn card_count(&self) -> ShuffleResult<i64> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM card", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn card(&self, id: CardId) -> ShuffleResult<Option<CardRow>> {
        let card = self
            .conn
            .query_row(
                "SELECT _id, name, set_id, cost, debt, type_event, type_landmark, edition
                 FROM card WHERE _id = ?1",
                params![id],
                |row| {
                    Ok(CardRow {
                        id:       row.get(0)?,
                        name:     row.get(1)?,
                        set_id:   row.get(2)?,
                        cost:     row.get(3)?,
                        debt:     row.get(4)?,
                        event:    row.get::<_, i32>(5)? != 0,
                        landmark: row.get::<_, i32>(6)? != 0,
                        edition:  row.get(7)?,
                    })
                },
            )
            .optional()?;
        Ok(card)
    }

    /// Ids of every card matching `filter`, in id order.
    pub fn matching_ids(&self, filter: &str) -> ShuffleResult<Vec<CardId>> {
        let where_clause = if filter.is_empty() {
            String::new()
        } else {
            format!(" WHERE {filter}")
        };
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT _id FROM card{where_clause} ORDER BY _id"))?;
        let ids = stmt.query_map([], |row| row.get::<_, CardId>(0))?;
        ids.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// The fields the shuffler needs for one card.
    pub fn candidate(&self, id: CardId) -> ShuffleResult<CandidateRecord> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT _id, type_event, type_landmark, set_id, cost FROM card WHERE _id = ?1",
        )?;
        let record = stmt.query_row(params![id], |row| {
            Ok(CandidateRecord {
                id:      row.get(0)?,
                special: row.get::<_, i32>(1)? != 0 || row.get::<_, i32>(2)? != 0,
                set_id:  row.get(3)?,
                cost:    row.get(4)?,
            })
        })?;
        Ok(record)
    }
}

/// Only the matching ids are read up front. They are shuffled with the
/// attempt's RNG, and each row is fetched when the shuffler pulls it.
impl CardSource for SupplyStore {
    fn query(&self, filter: &str, rng: &mut ShuffleRng) -> ShuffleResult<CandidateStream<'_>> {
        let mut ids = self.matching_ids(filter)?;
        rng.shuffle(&mut ids);
        Ok(CandidateStream::new(ids.into_iter().map(move |id| self.candidate(id))))
    }
}
