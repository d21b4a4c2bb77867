//! Thread-safe handle for hosts serving concurrent callers.
//!
//! Every pool operation takes `&mut Launchpad`, so a single writer is
//! enforced by the borrow checker. `SharedLaunchpad` puts the registry
//! behind one mutex and reads the clock inside the critical section: each
//! closure sees a consistent ledger and a `now` that never runs backwards
//! relative to the order operations commit in.

use std::sync::{Arc, Mutex};

use idopool_types::{LaunchpadError, Result, UnixTimestamp};

use crate::{clock::Clock, registry::Launchpad, vault::AssetLedger};

/// Cloneable, `Send + Sync` handle to a [`Launchpad`].
pub struct SharedLaunchpad<A: AssetLedger, C: Clock> {
    inner: Arc<Mutex<Launchpad<A>>>,
    clock: Arc<C>,
}

impl<A: AssetLedger, C: Clock> Clone for SharedLaunchpad<A, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<A: AssetLedger, C: Clock> SharedLaunchpad<A, C> {
    #[must_use]
    pub fn new(launchpad: Launchpad<A>, clock: C) -> Self {
        Self {
            inner: Arc::new(Mutex::new(launchpad)),
            clock: Arc::new(clock),
        }
    }

    /// Run `op` as one critical section with the current time.
    ///
    /// # Errors
    /// `Internal` if a previous holder panicked while holding the lock;
    /// otherwise whatever `op` returns.
    pub fn execute<R>(
        &self,
        op: impl FnOnce(&mut Launchpad<A>, UnixTimestamp) -> Result<R>,
    ) -> Result<R> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| LaunchpadError::Internal("launchpad lock poisoned".to_string()))?;
        let now = self.clock.now();
        op(&mut *guard, now)
    }

    /// The clock this handle stamps operations with.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }
}
