//! Outcome delivery.
//!
//! RULE: Delivery is fire-and-forget. A listener that has gone away
//! never turns into an error for the shuffler.

use crate::outcome::OutcomeNotice;
use std::sync::{
    mpsc::{self, Receiver, Sender},
    Arc, Mutex,
};

pub trait OutcomeNotifier: Send {
    fn deliver(&self, notice: &OutcomeNotice);
}

/// A single listener.
impl OutcomeNotifier for Sender<OutcomeNotice> {
    fn deliver(&self, notice: &OutcomeNotice) {
        if self.send(notice.clone()).is_err() {
            log::debug!("outcome listener gone, dropping {:?}", notice.outcome);
        }
    }
}

impl<T: OutcomeNotifier + Sync + ?Sized> OutcomeNotifier for Arc<T> {
    fn deliver(&self, notice: &OutcomeNotice) {
        (**self).deliver(notice)
    }
}

/// Fans each notice out to every live subscriber.
#[derive(Default)]
pub struct Broadcaster {
    subscribers: Mutex<Vec<Sender<OutcomeNotice>>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<OutcomeNotice> {
        let (tx, rx) = mpsc::channel();
        self.lock().push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Sender<OutcomeNotice>>> {
        // A panicked subscriber holder leaves the list itself intact.
        self.subscribers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl OutcomeNotifier for Broadcaster {
    fn deliver(&self, notice: &OutcomeNotice) {
        let mut subscribers = self.lock();
        let before = subscribers.len();
        subscribers.retain(|tx| tx.send(notice.clone()).is_ok());
        let dropped = before - subscribers.len();
        if dropped > 0 {
            log::debug!("dropped {dropped} closed outcome subscriber(s)");
        }
    }
}
