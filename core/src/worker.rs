//! Runs one shuffle attempt on its own thread.
//!
//! The caller keeps a ShuffleHandle: it can cancel the attempt at any
//! time and join it to get the store back. The outcome itself travels
//! through the notifier, never through shared state.

use crate::{
    config::ShuffleConfig,
    error::{ShuffleError, ShuffleResult},
    notify::OutcomeNotifier,
    outcome::ShuffleOutcome,
    rng::ShuffleRng,
    shuffler::Shuffler,
    store::SupplyStore,
};
use std::thread::{self, JoinHandle};
use tokio_util::sync::CancellationToken;

/// What a finished worker hands back.
pub struct Finished {
    pub store:   SupplyStore,
    /// Err only when the store failed. Listeners got an Aborted notice.
    pub outcome: ShuffleResult<ShuffleOutcome>,
}

pub struct ShuffleHandle {
    pub attempt_id: String,
    pub seed:       u64,
    cancel:         CancellationToken,
    join:           JoinHandle<Finished>,
}

impl ShuffleHandle {
    /// Ask the worker to stop at the next candidate boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn join(self) -> ShuffleResult<Finished> {
        self.join.join().map_err(|_| ShuffleError::WorkerPanicked)
    }
}

/// Start an attempt on a fresh worker thread. The store moves into the
/// worker for the duration of the attempt.
pub fn spawn_shuffle<N>(
    config:   ShuffleConfig,
    store:    SupplyStore,
    notifier: N,
    seed:     u64,
) -> ShuffleResult<ShuffleHandle>
where
    N: OutcomeNotifier + 'static,
{
    let attempt_id = uuid::Uuid::new_v4().to_string();
    let cancel = CancellationToken::new();

    let mut shuffler = Shuffler::new(
        attempt_id.clone(),
        config,
        ShuffleRng::new(seed),
        cancel.clone(),
    );
    let join = thread::Builder::new()
        .name(format!("shuffle-{}", &attempt_id[..8]))
        .spawn(move || {
            let outcome = shuffler.run(&store, &store, &notifier);
            Finished { store, outcome }
        })
        .map_err(|e| anyhow::anyhow!("cannot spawn shuffle worker: {e}"))?;

    log::debug!("attempt {attempt_id} started with seed {seed}");
    Ok(ShuffleHandle { attempt_id, seed, cancel, join })
}
