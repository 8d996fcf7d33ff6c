// This is the shared bounded buffer for MPMC - one ring, two semaphores, one lock

use crate::Core::semaphore::Semaphore;

use crossbeam_utils::CachePadded;
use parking_lot::Mutex;

/// The payload type moved by the demo workers.
///
/// The buffer itself is generic and never interprets what it stores; `0` is a
/// perfectly valid item.
pub type Item = u32;

/// Ring storage guarded by the buffer's mutex.
///
/// Occupancy is tracked by `filled` and the cursors only. A `None` slot means
/// "moved out by a consumer" or "never written", never "empty" in the
/// protocol sense.
pub(crate) struct Ring<T> {
    pub(crate) slots: Vec<Option<T>>,

    /// Next slot a producer writes. Always in `[0, capacity)`.
    pub(crate) write_cursor: usize,

    /// Next slot a consumer reads. Always in `[0, capacity)`.
    pub(crate) read_cursor: usize,

    /// Unread items currently in the ring.
    pub(crate) filled: usize,
}

/// A fixed-capacity, blocking, multi-producer multi-consumer ring buffer.
///
/// ### Concurrency Design:
/// - **Producers**: take a permit from `empty_slots` (parking while the ring is
///   full), lock the ring, write at `write_cursor`, unlock, then move the
///   permit to `filled_slots`.
/// - **Consumers**: the mirror image, taking from `filled_slots` and handing
///   the permit to `empty_slots`.
///
/// The semaphore is always taken before the lock and the lock is always
/// released before the complementary permit is published. Holding the lock
/// while parked on a semaphore would starve the other side forever.
pub struct BoundedBuffer<T> {
    pub(crate) ring: Mutex<Ring<T>>,

    /// Slots available for writing. Starts at `capacity`.
    /// Padded to keep the two hot counters on separate cache lines.
    pub(crate) empty_slots: CachePadded<Semaphore>,

    /// Slots available for reading. Starts at zero.
    pub(crate) filled_slots: CachePadded<Semaphore>,

    pub(crate) capacity: usize,
}

/// Permit counts of both semaphores at one instant.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PermitCounts {
    pub empty: usize,
    pub filled: usize,
}

impl PermitCounts {
    /// `empty + filled`, which equals the capacity whenever no call is mid-flight.
    pub fn total(&self) -> usize {
        self.empty + self.filled
    }
}
