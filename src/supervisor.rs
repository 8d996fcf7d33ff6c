//! Lifecycle driver: starts the workers, swaps the buffer on reconfiguration,
//! and shuts everything down.
//!
//! Reconfiguration is quiesce-then-swap. The running generation's token is
//! cancelled, every parked worker is woken and joined, and only then is a new
//! buffer built and a new generation of workers started against it. No worker
//! is ever left parked on a buffer nobody will signal again.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{validate_capacity, DemoConfig};
use crate::error::Result;
use crate::events::EventSink;
use crate::Core::cancel::CancelToken;
use crate::MPMC::Buffer::{BoundedBuffer, Item};
use crate::MPMC::Structs::Buffer_Structs::{Snapshot, WorkerReport};
use crate::MPMC::{BufferBuilder, Pipeline, WorkerHandle};

type SharedBuffer = Arc<RwLock<Arc<BoundedBuffer<Item>>>>;

/// Read-only view that always follows the supervisor's current buffer.
#[derive(Clone)]
pub struct BufferWatch {
    current: SharedBuffer,
}

impl BufferWatch {
    pub fn snapshot(&self) -> Snapshot<Item> {
        // Clone the Arc and drop the read lock before touching the ring
        let buffer = Arc::clone(&*self.current.read());
        buffer.snapshot()
    }

    pub fn capacity(&self) -> usize {
        self.current.read().capacity()
    }
}

impl fmt::Debug for BufferWatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferWatch")
            .field("capacity", &self.capacity())
            .finish()
    }
}

pub struct Supervisor {
    pub(crate) config: DemoConfig,
    pub(crate) sink: Arc<dyn EventSink>,
    pub(crate) current: SharedBuffer,
    pub(crate) cancel: CancelToken,
    pub(crate) workers: Vec<WorkerHandle>,
    pub(crate) generation: u64,
}

impl Supervisor {
    /// Validate `config`, build the first buffer and start every worker.
    pub fn start(config: DemoConfig, sink: Arc<dyn EventSink>) -> Result<Self> {
        config.validate()?;
        let pipeline = Self::pipeline(&config, config.capacity, &sink)?;

        let mut supervisor = Self {
            current: Arc::new(RwLock::new(Arc::clone(pipeline.buffer()))),
            cancel: pipeline.cancel_token().clone(),
            workers: Vec::with_capacity(config.producers + config.consumers),
            generation: 0,
            config,
            sink,
        };
        // On a spawn failure the supervisor is dropped, which quiesces whatever did start
        supervisor.spawn_workers(&pipeline)?;
        info!(
            capacity = supervisor.capacity(),
            producers = supervisor.config.producers,
            consumers = supervisor.config.consumers,
            "supervisor started"
        );
        Ok(supervisor)
    }

    fn pipeline(config: &DemoConfig, capacity: usize, sink: &Arc<dyn EventSink>) -> Result<Pipeline> {
        BufferBuilder::new()
            .with_capacity(capacity)
            .with_pacing(config.pacing)
            .with_sink(Arc::clone(sink))
            .with_cancel_token(CancelToken::new())
            .build()
    }

    fn spawn_workers(&mut self, pipeline: &Pipeline) -> Result<()> {
        for id in 0..self.config.producers {
            self.workers.push(pipeline.producer(id).spawn()?);
        }
        for id in 0..self.config.consumers {
            self.workers.push(pipeline.consumer(id).spawn()?);
        }
        Ok(())
    }

    /// Replace the buffer with a fresh one of `capacity` slots.
    ///
    /// The capacity is checked before anything is stopped. Items still in the
    /// old buffer are discarded with it. Returns the reports of the retired
    /// worker generation.
    pub fn reconfigure(&mut self, capacity: usize) -> Result<Vec<WorkerReport>> {
        let capacity = validate_capacity(capacity as i64)?;
        let reports = self.quiesce()?;

        let pipeline = Self::pipeline(&self.config, capacity, &self.sink)?;
        *self.current.write() = Arc::clone(pipeline.buffer());
        self.cancel = pipeline.cancel_token().clone();
        self.config.capacity = capacity;
        self.generation += 1;
        self.spawn_workers(&pipeline)?;

        info!(capacity, generation = self.generation, "buffer reconfigured");
        Ok(reports)
    }

    /// Cancel the current generation, wake anything parked on the buffer and
    /// join every worker.
    fn quiesce(&mut self) -> Result<Vec<WorkerReport>> {
        self.cancel.cancel();
        self.current.read().wake_all();

        let mut reports = Vec::with_capacity(self.workers.len());
        let mut failure = None;
        for handle in self.workers.drain(..) {
            match handle.join() {
                Ok(report) => reports.push(report),
                Err(e) => {
                    warn!(error = %e, "worker did not stop cleanly");
                    failure.get_or_insert(e);
                }
            }
        }
        debug!(generation = self.generation, joined = reports.len(), "workers quiesced");

        match failure {
            Some(e) => Err(e),
            None => Ok(reports),
        }
    }

    /// Stop every worker and return their reports.
    pub fn shutdown(mut self) -> Result<Vec<WorkerReport>> {
        let reports = self.quiesce()?;
        info!(workers = reports.len(), "supervisor shut down");
        Ok(reports)
    }

    pub fn watch(&self) -> BufferWatch {
        BufferWatch {
            current: Arc::clone(&self.current),
        }
    }

    pub fn snapshot(&self) -> Snapshot<Item> {
        self.watch().snapshot()
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Shared handle to the current buffer. Stale after the next reconfiguration.
    pub fn buffer(&self) -> Arc<BoundedBuffer<Item>> {
        Arc::clone(&*self.current.read())
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    /// How many times the buffer has been replaced.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        if !self.workers.is_empty() {
            if let Err(e) = self.quiesce() {
                warn!(error = %e, "supervisor dropped with a failed worker");
            }
        }
    }
}

impl fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_supervisor(self, f)
    }
}
