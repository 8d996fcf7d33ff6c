//! Periodic, read-only polling of the current buffer for display.

use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

use crate::error::{BufferError, Result};
use crate::supervisor::BufferWatch;
use crate::Core::cancel::CancelToken;
use crate::MPMC::Buffer::Item;
use crate::MPMC::Structs::Buffer_Structs::Snapshot;

/// A background thread handing a fresh [`Snapshot`] to a callback every
/// `interval`. It only ever calls [`BufferWatch::snapshot`].
///
/// Snapshots are best effort: a cursor may be one step behind an operation
/// that completes during the poll. Fine for display, not for accounting.
#[derive(Debug)]
pub struct Observer {
    cancel: CancelToken,
    handle: JoinHandle<u64>,
}

impl Observer {
    pub fn spawn<F>(watch: BufferWatch, interval: Duration, mut on_snapshot: F) -> Result<Self>
    where
        F: FnMut(&Snapshot<Item>) + Send + 'static,
    {
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let handle = thread::Builder::new()
            .name("observer".into())
            .spawn(move || {
                let mut polls = 0u64;
                loop {
                    let snapshot = watch.snapshot();
                    on_snapshot(&snapshot);
                    polls += 1;
                    if token.sleep(interval) {
                        break;
                    }
                }
                debug!(polls, "observer stopped");
                polls
            })?;
        Ok(Self { cancel, handle })
    }

    /// Stop polling and return how many snapshots were taken.
    pub fn stop(self) -> Result<u64> {
        self.cancel.cancel();
        self.handle
            .join()
            .map_err(|_| BufferError::panicked("observer"))
    }
}
