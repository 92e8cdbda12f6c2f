//! Re-entrancy latch.
//!
//! Token ledgers are external code. A hostile ledger could call back
//! into the service from inside `transfer`, observing half-settled state
//! or double-spending an accrued reward. The latch records which threads
//! currently hold an entry: a nested call on the same thread fails fast
//! with [`EngineError::ReentrancyBlocked`] instead of deadlocking on the
//! engine lock it already holds, while unrelated threads pass through
//! and simply queue on that lock.

use std::collections::HashSet;
use std::thread::{self, ThreadId};

use parking_lot::Mutex;
use prorata_core::error::EngineError;

#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    holders: Mutex<HashSet<ThreadId>>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim an entry for the current thread, failing if this thread
    /// already holds one.
    ///
    /// The returned token releases the entry on drop, including on the
    /// error paths of the guarded operation.
    pub fn enter(&self) -> Result<Entered<'_>, EngineError> {
        let me = thread::current().id();
        if !self.holders.lock().insert(me) {
            return Err(EngineError::ReentrancyBlocked);
        }
        Ok(Entered { guard: self, thread: me })
    }
}

/// RAII token proving the current thread holds an entry.
pub struct Entered<'a> {
    guard: &'a ReentrancyGuard,
    thread: ThreadId,
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        self.guard.holders.lock().remove(&self.thread);
    }
}
