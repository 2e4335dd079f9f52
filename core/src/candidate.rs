//! Candidate records and the pull-based stream the shuffler consumes.
//!
//! A CardSource hands back every card matching a filter, already in
//! random order. The shuffler pulls from the stream one card at a time
//! and may drop it half-read once the supply is full. Records may be
//! fetched as they are pulled, so each pull can fail.

use crate::{
    error::ShuffleResult,
    rng::ShuffleRng,
    types::{CardId, SetId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id:      CardId,
    /// Events and landmarks. They count against the special cap,
    /// not the kingdom.
    pub special: bool,
    /// Coin cost as printed. Debt costs carry a trailing "D".
    pub cost:    String,
    pub set_id:  SetId,
}

/// A finite, non-restartable sequence of candidates.
pub struct CandidateStream<'a> {
    inner:   Box<dyn Iterator<Item = ShuffleResult<CandidateRecord>> + 'a>,
    yielded: usize,
}

impl<'a> CandidateStream<'a> {
    pub fn new<I>(records: I) -> Self
    where
        I: IntoIterator<Item = ShuffleResult<CandidateRecord>>,
        I::IntoIter: 'a,
    {
        Self { inner: Box::new(records.into_iter()), yielded: 0 }
    }

    /// Number of candidates pulled so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }
}

impl Iterator for CandidateStream<'_> {
    type Item = ShuffleResult<CandidateRecord>;

    fn next(&mut self) -> Option<ShuffleResult<CandidateRecord>> {
        let next = self.inner.next();
        if next.is_some() {
            self.yielded += 1;
        }
        next
    }
}

/// Anything that can answer "all cards matching this filter, shuffled".
///
/// An empty filter matches every card. Ordering draws from `rng` so one
/// seed reproduces one attempt.
pub trait CardSource {
    fn query(&self, filter: &str, rng: &mut ShuffleRng) -> ShuffleResult<CandidateStream<'_>>;
}
