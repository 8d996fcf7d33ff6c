use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::time::Duration;
use tracing::trace;

use super::cancel::CancelToken;
use crate::error::{BufferError, Result};

/// Longest a waiter stays parked before it re-checks its cancel token.
/// Bounds cancellation latency even when nobody calls [`Semaphore::wake_all`].
pub const WAIT_SLICE: Duration = Duration::from_millis(20);

/// A counting semaphore built on a parking_lot mutex/condvar pair.
///
/// Permits are handed out as [`Permit`] guards. A guard that is dropped goes
/// back to the semaphore it came from, so a permit can only leave the system
/// through an explicit [`Permit::transfer_to`].
pub struct Semaphore {
    pub(crate) name: &'static str,
    pub(crate) count: Mutex<usize>,
    pub(crate) available: Condvar,
}

impl Semaphore {
    pub fn new(name: &'static str, permits: usize) -> Self {
        Self {
            name,
            count: Mutex::new(permits),
            available: Condvar::new(),
        }
    }

    /// Take one permit, parking the caller while none is available.
    ///
    /// The token is checked before every attempt, so a cancelled caller never
    /// walks away holding a permit. Returns [`BufferError::Cancelled`] once the
    /// token fires.
    pub fn acquire(&self, cancel: &CancelToken) -> Result<Permit<'_>> {
        let mut count = self.count.lock();
        loop {
            if cancel.is_cancelled() {
                return Err(BufferError::Cancelled);
            }
            if *count > 0 {
                *count -= 1;
                trace!(semaphore = self.name, remaining = *count, "permit acquired");
                return Ok(Permit { origin: self });
            }
            self.available.wait_for(&mut count, WAIT_SLICE);
        }
    }

    /// Take one permit only if it is immediately available.
    pub fn try_acquire(&self) -> Option<Permit<'_>> {
        let mut count = self.count.lock();
        if *count == 0 {
            return None;
        }
        *count -= 1;
        Some(Permit { origin: self })
    }

    /// Number of permits currently available.
    pub fn available(&self) -> usize {
        *self.count.lock()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Wake every parked waiter so it re-checks its cancel token.
    pub fn wake_all(&self) {
        let _count = self.count.lock();
        self.available.notify_all();
    }

    fn add_permit(&self) {
        {
            let mut count = self.count.lock();
            *count += 1;
        }
        self.available.notify_one();
    }
}

/// One acquired unit of a [`Semaphore`].
#[must_use = "dropping a permit hands it straight back to its semaphore"]
pub struct Permit<'a> {
    origin: &'a Semaphore,
}

impl<'a> Permit<'a> {
    /// Release this permit into `target` instead of its origin.
    ///
    /// This is how a slot changes hands between the empty and filled counts.
    pub fn transfer_to(self, target: &Semaphore) {
        std::mem::forget(self);
        target.add_permit();
    }

    pub fn origin(&self) -> &'a Semaphore {
        self.origin
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.origin.add_permit();
    }
}

impl fmt::Debug for Semaphore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_semaphore(self, f)
    }
}
