use std::thread::JoinHandle;

use crate::error::{BufferError, Result};
use crate::MPMC::Structs::Buffer_Structs::{WorkerId, WorkerReport};

/// A running worker thread.
#[derive(Debug)]
pub struct WorkerHandle {
    pub(crate) worker: WorkerId,
    pub(crate) handle: JoinHandle<WorkerReport>,
}

impl WorkerHandle {
    pub fn worker(&self) -> WorkerId {
        self.worker
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker to leave its loop. Does not cancel it.
    pub fn join(self) -> Result<WorkerReport> {
        self.handle
            .join()
            .map_err(|_| BufferError::panicked(self.worker.thread_name()))
    }
}
