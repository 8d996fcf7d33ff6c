mod builder;
mod consumer;
mod handle;
mod producer;

pub use builder::{BufferBuilder, Pipeline};
pub use consumer::Consumer;
pub use handle::WorkerHandle;
pub use producer::Producer;

pub mod Buffer {
    pub mod Buffer;
    pub mod Buffer_impl;
    pub use Buffer::{BoundedBuffer, Item, PermitCounts}; // re-export for stable path
}

pub mod Structs {
    pub mod Buffer_Structs;
    pub use Buffer_Structs::{Event, EventKind, Role, Snapshot, WorkerId, WorkerReport}; // re-export for stable path
}
