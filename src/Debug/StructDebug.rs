use std::fmt;
use crate::supervisor::Supervisor;
use crate::Core::semaphore::Semaphore;
use crate::MPMC::Buffer::BoundedBuffer;

/// Debug function for BoundedBuffer
///
/// Shows capacity and both permit counts. The cursors are only shown if the
/// ring lock is free right now, so formatting never parks behind a worker.
pub fn debug_bounded_buffer<T>(buffer: &BoundedBuffer<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut s = f.debug_struct("BoundedBuffer");
    s.field("capacity", &buffer.capacity)
        .field("empty_slots", &buffer.empty_slots.available())
        .field("filled_slots", &buffer.filled_slots.available());
    match buffer.ring.try_lock() {
        Some(ring) => s
            .field("write_cursor", &ring.write_cursor)
            .field("read_cursor", &ring.read_cursor)
            .field("filled", &ring.filled)
            .finish(),
        None => s.field("ring", &"<locked>").finish(),
    }
}

/// Debug function for Semaphore
pub fn debug_semaphore(semaphore: &Semaphore, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Semaphore")
        .field("name", &semaphore.name)
        .field("available", &semaphore.available())
        .finish()
}

/// Debug function for Supervisor
///
/// Shows the live generation without touching any worker.
pub fn debug_supervisor(supervisor: &Supervisor, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Supervisor")
        .field("capacity", &supervisor.config.capacity)
        .field("generation", &supervisor.generation)
        .field("workers", &supervisor.workers.len())
        .field("cancelled", &supervisor.cancel.is_cancelled())
        .finish_non_exhaustive()
}
