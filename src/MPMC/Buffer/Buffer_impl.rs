use crossbeam_utils::CachePadded;
use parking_lot::Mutex;
use std::fmt;
use tracing::debug;

use super::Buffer::{BoundedBuffer, PermitCounts, Ring};
use crate::error::{BufferError, Result};
use crate::Core::cancel::CancelToken;
use crate::Core::semaphore::Semaphore;
use crate::MPMC::Structs::Buffer_Structs::Snapshot;

impl<T> Ring<T> {
    fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            write_cursor: 0,
            read_cursor: 0,
            filled: 0,
        }
    }

    #[inline]
    fn write(&mut self, item: T) {
        let capacity = self.slots.len();
        self.slots[self.write_cursor] = Some(item);
        self.write_cursor = (self.write_cursor + 1) % capacity;
        self.filled += 1;
    }

    #[inline]
    fn read(&mut self) -> Option<T> {
        let capacity = self.slots.len();
        let item = self.slots[self.read_cursor].take();
        self.read_cursor = (self.read_cursor + 1) % capacity;
        self.filled -= 1;
        item
    }
}

impl<T> BoundedBuffer<T> {
    /// Create a buffer with `capacity` slots.
    ///
    /// Fails with [`BufferError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(BufferError::capacity(capacity));
        }
        debug!(capacity, "bounded buffer created");
        Ok(Self {
            ring: Mutex::new(Ring::with_capacity(capacity)),
            empty_slots: CachePadded::new(Semaphore::new("empty_slots", capacity)),
            filled_slots: CachePadded::new(Semaphore::new("filled_slots", 0)),
            capacity,
        })
    }

    /// Store `item`, parking while the buffer is full.
    ///
    /// On [`BufferError::Cancelled`] the item is dropped and the buffer is untouched.
    pub fn produce(&self, item: T, cancel: &CancelToken) -> Result<()> {
        let permit = self.empty_slots.acquire(cancel)?;
        {
            let mut ring = self.ring.lock();
            ring.write(item);
        }
        permit.transfer_to(&self.filled_slots);
        Ok(())
    }

    /// Take the oldest item, parking while the buffer is empty.
    ///
    /// On [`BufferError::Cancelled`] nothing is read and the buffer is untouched.
    pub fn consume(&self, cancel: &CancelToken) -> Result<T> {
        let permit = self.filled_slots.acquire(cancel)?;
        let item = {
            let mut ring = self.ring.lock();
            ring.read()
        };
        permit.transfer_to(&self.empty_slots);
        Ok(item.expect("a filled-slot permit always covers a written slot"))
    }

    /// Store `item` only if a slot is free right now; hands the item back otherwise.
    pub fn try_produce(&self, item: T) -> std::result::Result<(), T> {
        let Some(permit) = self.empty_slots.try_acquire() else {
            return Err(item);
        };
        {
            let mut ring = self.ring.lock();
            ring.write(item);
        }
        permit.transfer_to(&self.filled_slots);
        Ok(())
    }

    /// Take the oldest item only if one is ready right now.
    pub fn try_consume(&self) -> Option<T> {
        let permit = self.filled_slots.try_acquire()?;
        let item = {
            let mut ring = self.ring.lock();
            ring.read()
        };
        permit.transfer_to(&self.empty_slots);
        item
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Unread items, as seen by the ring under its lock.
    pub fn len(&self) -> usize {
        self.ring.lock().filled
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    /// Read both semaphore counts. Only meaningful as an invariant check when
    /// no produce/consume call is in flight.
    pub fn permits(&self) -> PermitCounts {
        PermitCounts {
            empty: self.empty_slots.available(),
            filled: self.filled_slots.available(),
        }
    }

    /// Nudge every producer and consumer parked on this buffer so they re-check
    /// their cancel tokens immediately.
    pub fn wake_all(&self) {
        self.empty_slots.wake_all();
        self.filled_slots.wake_all();
    }
}

impl<T: Clone> BoundedBuffer<T> {
    /// Copy the cursors and slots for display.
    ///
    /// The lock is held only for the copy. The result may be one operation
    /// stale by the time the caller looks at it, but it is never torn.
    pub fn snapshot(&self) -> Snapshot<T> {
        let ring = self.ring.lock();
        Snapshot {
            write_cursor: ring.write_cursor,
            read_cursor: ring.read_cursor,
            filled: ring.filled,
            capacity: self.capacity,
            slots: ring.slots.clone(),
        }
    }
}

impl<T> fmt::Debug for BoundedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_bounded_buffer(self, f)
    }
}
