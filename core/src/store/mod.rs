//! SQLite persistence layer.
//!
//! RULE: Only store/ talks to the database.
//! The shuffler reads cards through CardSource and writes history
//! through HistorySink; it never executes SQL directly.

mod card;
mod history;

pub use card::CardRow;
pub use history::HistoryRecord;

use crate::error::ShuffleResult;
use rusqlite::Connection;

pub struct SupplyStore {
    conn: Connection,
}

impl SupplyStore {
    pub fn open(path: &str) -> ShuffleResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        log::debug!("opened supply store at {path}");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ShuffleResult<Self> {
        let conn = Connection::open(":memory:")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> ShuffleResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_cards.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_history.sql"))?;
        Ok(())
    }
}
