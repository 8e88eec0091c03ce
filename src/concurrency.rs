//! Fetch epochs for abandoning stale lazy loads
//!
//! A lazy fetch may suspend while the data source performs I/O. If the host
//! swaps the tree (resets the index) during that suspension, the fetch's
//! result belongs to a discarded tree and must not be applied. Each fetch takes
//! an [`EpochTicket`] before suspending and checks it after resuming.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic generation counter shared by an index and its in-flight fetches
#[derive(Debug, Clone, Default)]
pub struct Epoch {
    current: Arc<AtomicU64>,
}

impl Epoch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation
    pub fn get(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }

    /// Start a new generation; every ticket issued earlier becomes stale.
    pub fn advance(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Ticket for the current generation
    pub fn ticket(&self) -> EpochTicket {
        EpochTicket {
            issued: self.get(),
            epoch: self.clone(),
        }
    }
}

/// Proof that work started in a given generation
#[derive(Debug, Clone)]
pub struct EpochTicket {
    issued: u64,
    epoch: Epoch,
}

impl EpochTicket {
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// True while no reset happened since the ticket was issued
    pub fn is_current(&self) -> bool {
        self.epoch.get() == self.issued
    }
}
