//! History table: supplies written by successful shuffles.

use super::SupplyStore;
use crate::{
    error::{ShuffleError, ShuffleResult},
    outcome::{HistorySink, NewHistory},
    types::{CardId, SupplyId, NO_BANE},
};
use rusqlite::{params, types::Type, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id:        SupplyId,
    pub name:      Option<String>,
    pub time:      i64,
    pub cards:     Vec<CardId>,
    pub bane:      Option<CardId>,
    pub high_cost: bool,
    pub shelters:  bool,
}

impl HistoryRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let cards: String = row.get(3)?;
        let bane: CardId = row.get(4)?;
        Ok(Self {
            id:        row.get(0)?,
            name:      row.get(1)?,
            time:      row.get(2)?,
            cards:     parse_card_list(&cards)?,
            bane:      (bane != NO_BANE).then_some(bane),
            high_cost: row.get::<_, i32>(5)? != 0,
            shelters:  row.get::<_, i32>(6)? != 0,
        })
    }
}

/// Comma-joined card ids as written by the reporter. An id that does not
/// parse is a conversion error on the `cards` column.
fn parse_card_list(cards: &str) -> rusqlite::Result<Vec<CardId>> {
    cards
        .split(',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.trim().parse::<CardId>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e))
            })
        })
        .collect()
}

impl SupplyStore {
    // ── History ───────────────────────────────────────────────────

    /// Insert a supply. Its id is its timestamp, bumped past the newest
    /// existing id so ids strictly increase.
    pub fn append_history(&self, entry: &NewHistory) -> ShuffleResult<SupplyId> {
        let last: Option<SupplyId> =
            self.conn.query_row("SELECT MAX(_id) FROM history", [], |row| row.get(0))?;
        let id = match last {
            Some(last) if last >= entry.time => last + 1,
            _ => entry.time,
        };
        self.conn.execute(
            "INSERT INTO history (_id, name, time, cards, bane, high_cost, shelters)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                id,
                entry.name,
                entry.time,
                entry.cards,
                entry.bane,
                entry.high_cost,
                entry.shelters,
            ],
        )?;
        log::debug!("history {id}: cards=[{}] bane={}", entry.cards, entry.bane);
        Ok(id)
    }

    pub fn history_record(&self, id: SupplyId) -> ShuffleResult<Option<HistoryRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT _id, name, time, cards, bane, high_cost, shelters
                 FROM history WHERE _id = ?1",
                params![id],
                HistoryRecord::from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Newest first.
    pub fn recent_history(&self, limit: usize) -> ShuffleResult<Vec<HistoryRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT _id, name, time, cards, bane, high_cost, shelters
             FROM history ORDER BY _id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], HistoryRecord::from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Name a supply, e.g. to keep it as a favourite. None clears the name.
    pub fn rename_history(&self, id: SupplyId, name: Option<&str>) -> ShuffleResult<()> {
        let changed = self.conn.execute(
            "UPDATE history SET name = ?1 WHERE _id = ?2",
            params![name, id],
        )?;
        if changed == 0 {
            return Err(ShuffleError::HistoryNotFound { id });
        }
        Ok(())
    }

    // ── Test / summary helpers ────────────────────────────────────────

    /// Number of history records persisted (for tests).
    pub fn history_count(&self) -> ShuffleResult<i64> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl HistorySink for SupplyStore {
    fn record(&self, entry: &NewHistory) -> ShuffleResult<SupplyId> {
        self.append_history(entry)
    }
}
