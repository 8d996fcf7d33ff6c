// Module naming follows project convention (MPMC = Multi-Producer Multi-Consumer)
#[allow(non_snake_case)]
pub mod MPMC;

#[allow(non_snake_case)]
pub mod Core {
    pub mod cancel;
    pub mod semaphore;
    pub use cancel::CancelToken;
    pub use semaphore::{Permit, Semaphore, WAIT_SLICE};
}

#[allow(non_snake_case)]
pub(crate) mod Debug {
    pub mod StructDebug;
}

pub mod config;
pub mod error;
pub mod events;
pub mod observer;
pub mod supervisor;

pub use config::{DemoConfig, Pacing};
pub use error::{BufferError, Result};
pub use events::{ChannelSink, EventSink, NullSink, TracingSink};
pub use observer::Observer;
pub use supervisor::{BufferWatch, Supervisor};
pub use Core::CancelToken;
pub use MPMC::Buffer::{BoundedBuffer, Item, PermitCounts};
pub use MPMC::Structs::{Event, EventKind, Role, Snapshot, WorkerId, WorkerReport};
pub use MPMC::{BufferBuilder, Consumer, Pipeline, Producer, WorkerHandle};
