//! Event sinks for the worker event stream.
//!
//! Each successful produce/consume emits one [`Event`]; each worker also
//! emits a final `Stopped` event when it leaves its loop. Sinks are passed to
//! the workers explicitly, nothing is written to process-wide streams.

use crossbeam_channel::{Receiver, Sender};
use tracing::info;

use crate::MPMC::Structs::Buffer_Structs::Event;

pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

/// Logs every event as one `info` line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: Event) {
        info!(
            target: "dmxp_bounded::events",
            role = %event.worker.role,
            worker = event.worker.id,
            "{event}"
        );
    }
}

/// Forwards events over an unbounded crossbeam channel.
///
/// Events emitted after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<Event>,
}

impl ChannelSink {
    pub fn new() -> (Self, Receiver<Event>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }

    pub fn from_sender(tx: Sender<Event>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: Event) {
        let _ = self.tx.send(event);
    }
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: Event) {}
}
