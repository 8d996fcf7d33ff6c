use super::{Consumer, Producer};
use crate::config::{Pacing, DEFAULT_CAPACITY};
use crate::error::Result;
use crate::events::{EventSink, TracingSink};
use crate::Core::cancel::CancelToken;
use crate::MPMC::Buffer::{BoundedBuffer, Item};
use std::sync::Arc;

pub struct BufferBuilder {
    capacity: usize,
    pacing: Pacing,
    sink: Arc<dyn EventSink>,
    cancel: CancelToken,
}

impl Default for BufferBuilder {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            pacing: Pacing::reference(),
            sink: Arc::new(TracingSink),
            cancel: CancelToken::new(),
        }
    }
}

impl BufferBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn build(self) -> Result<Pipeline> {
        let buffer = Arc::new(BoundedBuffer::new(self.capacity)?);
        Ok(Pipeline {
            buffer,
            pacing: self.pacing,
            sink: self.sink,
            cancel: self.cancel,
        })
    }
}

/// One buffer plus everything its workers share: pacing, event sink and cancel token.
pub struct Pipeline {
    buffer: Arc<BoundedBuffer<Item>>,
    pacing: Pacing,
    sink: Arc<dyn EventSink>,
    cancel: CancelToken,
}

impl Pipeline {
    pub fn buffer(&self) -> &Arc<BoundedBuffer<Item>> {
        &self.buffer
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn producer(&self, id: usize) -> Producer {
        Producer::new(
            Arc::clone(&self.buffer),
            id,
            Arc::clone(&self.sink),
            self.cancel.clone(),
        )
        .with_pacing(self.pacing)
    }

    pub fn consumer(&self, id: usize) -> Consumer {
        Consumer::new(
            Arc::clone(&self.buffer),
            id,
            Arc::clone(&self.sink),
            self.cancel.clone(),
        )
        .with_pacing(self.pacing)
    }
}
