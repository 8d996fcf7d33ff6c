// src/MPMC/consumer.rs

use crate::config::Pacing;
use crate::error::Result;
use crate::events::EventSink;
use crate::Core::cancel::CancelToken;
use crate::MPMC::Buffer::{BoundedBuffer, Item};
use crate::MPMC::Structs::Buffer_Structs::{Event, WorkerId, WorkerReport};
use crate::MPMC::WorkerHandle;
use std::fmt;
use std::sync::Arc;
use std::thread;
use tracing::debug;

/// A worker that repeatedly takes the oldest item from a shared buffer.
pub struct Consumer {
    id: usize,
    buffer: Arc<BoundedBuffer<Item>>,
    pacing: Pacing,
    sink: Arc<dyn EventSink>,
    cancel: CancelToken,
}

impl Consumer {
    pub fn new(
        buffer: Arc<BoundedBuffer<Item>>,
        id: usize,
        sink: Arc<dyn EventSink>,
        cancel: CancelToken,
    ) -> Self {
        Self {
            id,
            buffer,
            pacing: Pacing::reference(),
            sink,
            cancel,
        }
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn worker(&self) -> WorkerId {
        WorkerId::consumer(self.id)
    }

    /// Run the loop on the calling thread until the token fires.
    ///
    /// A consume interrupted by cancellation moves nothing and ends the loop;
    /// it is never retried.
    pub fn run(self) -> WorkerReport {
        let worker = self.worker();
        let mut transferred = 0u64;
        debug!(%worker, capacity = self.buffer.capacity(), "consumer started");

        while !self.cancel.is_cancelled() {
            let item = match self.buffer.consume(&self.cancel) {
                Ok(item) => item,
                Err(e) => {
                    debug!(%worker, error = %e, "consumer left a blocked consume");
                    break;
                }
            };
            transferred += 1;
            self.sink.emit(Event::consumed(self.id, item));

            if self.cancel.sleep(self.pacing.next_delay()) {
                break;
            }
        }

        debug!(%worker, transferred, "consumer stopped");
        self.sink.emit(Event::stopped(worker, transferred));
        WorkerReport { worker, transferred }
    }

    /// Start the loop on a dedicated, named OS thread.
    pub fn spawn(self) -> Result<WorkerHandle> {
        let worker = self.worker();
        let handle = thread::Builder::new()
            .name(worker.thread_name())
            .spawn(move || self.run())?;
        Ok(WorkerHandle { worker, handle })
    }
}

impl fmt::Debug for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("id", &self.id)
            .field("capacity", &self.buffer.capacity())
            .field("pacing", &self.pacing)
            .field("cancel", &self.cancel)
            .finish()
    }
}
