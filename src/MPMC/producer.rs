// In src/MPMC/producer.rs
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

type Generator = Box<dyn FnMut() -> Item + Send>;

/// A worker that repeatedly generates an item and stores it in a shared buffer.
///
/// The loop checks its cancel token at the top of every iteration, after every
/// blocking call and during its idle sleep, so a cancelled producer never
/// enters `produce` again.
pub struct Producer {
    id: usize,
    buffer: Arc<BoundedBuffer<Item>>,
    pacing: Pacing,
    sink: Arc<dyn EventSink>,
    cancel: CancelToken,
    generator: Option<Generator>,
}

impl Producer {
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
            generator: None,
        }
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Replace the default item source (uniform in `1..=capacity`).
    pub fn with_generator<F>(mut self, generator: F) -> Self
    where
        F: FnMut() -> Item + Send + 'static,
    {
        self.generator = Some(Box::new(generator));
        self
    }

    pub fn worker(&self) -> WorkerId {
        WorkerId::producer(self.id)
    }

    fn next_item(&mut self) -> Item {
        match self.generator.as_mut() {
            Some(generate) => generate(),
            None => {
                let upper = Item::try_from(self.buffer.capacity()).unwrap_or(Item::MAX);
                fastrand::u32(1..=upper)
            }
        }
    }

    /// Run the loop on the calling thread until the token fires.
    pub fn run(mut self) -> WorkerReport {
        let worker = self.worker();
        let mut transferred = 0u64;
        debug!(%worker, capacity = self.buffer.capacity(), "producer started");

        while !self.cancel.is_cancelled() {
            let item = self.next_item();
            if let Err(e) = self.buffer.produce(item, &self.cancel) {
                debug!(%worker, item, error = %e, "producer left a blocked produce");
                break;
            }
            transferred += 1;
            self.sink.emit(Event::produced(self.id, item));

            if self.cancel.sleep(self.pacing.next_delay()) {
                break;
            }
        }

        debug!(%worker, transferred, "producer stopped");
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

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("id", &self.id)
            .field("capacity", &self.buffer.capacity())
            .field("pacing", &self.pacing)
            .field("cancel", &self.cancel)
            .field("custom_generator", &self.generator.is_some())
            .finish()
    }
}
