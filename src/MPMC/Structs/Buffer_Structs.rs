// Plain data carried out of the buffer and the workers: snapshots, identities, events

use std::fmt;

use crate::MPMC::Buffer::Item;

/// A point-in-time copy of a buffer's cursors and slots, for display only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot<T> {
    pub write_cursor: usize,
    pub read_cursor: usize,
    /// Unread items at the time of the copy.
    pub filled: usize,
    pub capacity: usize,
    pub slots: Vec<Option<T>>,
}

impl<T> Snapshot<T> {
    /// Whether slot `index` holds an unread item.
    ///
    /// Derived from the read cursor and fill count, never from the slot value.
    pub fn occupied(&self, index: usize) -> bool {
        if index >= self.capacity {
            return false;
        }
        let offset = (index + self.capacity - self.read_cursor) % self.capacity;
        offset < self.filled
    }

    /// The unread items in the order consumers will see them.
    pub fn pending(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.filled)
            .map(move |k| (self.read_cursor + k) % self.capacity)
            .filter_map(move |index| self.slots[index].as_ref())
    }
}

/// Two-line cell strip: unread values on top, `W`/`R` cursor markers below.
impl<T: fmt::Display> fmt::Display for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, slot) in self.slots.iter().enumerate() {
            match slot {
                Some(value) if self.occupied(index) => write!(f, "[{value:>3}]")?,
                _ => f.write_str("[   ]")?,
            }
        }
        writeln!(f)?;

        let mut markers = String::with_capacity(self.capacity * 5);
        for index in 0..self.capacity {
            let cell = match (index == self.write_cursor, index == self.read_cursor) {
                (true, true) => " W/R ",
                (true, false) => "  W  ",
                (false, true) => "  R  ",
                (false, false) => "     ",
            };
            markers.push_str(cell);
        }
        writeln!(f, "{}", markers.trim_end())?;
        write!(
            f,
            "write={} read={} filled={}/{}",
            self.write_cursor, self.read_cursor, self.filled, self.capacity
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Producer,
    Consumer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Producer => f.write_str("Producer"),
            Role::Consumer => f.write_str("Consumer"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct WorkerId {
    pub role: Role,
    pub id: usize,
}

impl WorkerId {
    pub fn producer(id: usize) -> Self {
        Self { role: Role::Producer, id }
    }

    pub fn consumer(id: usize) -> Self {
        Self { role: Role::Consumer, id }
    }

    /// Thread name used when the worker is spawned.
    pub fn thread_name(&self) -> String {
        match self.role {
            Role::Producer => format!("producer-{}", self.id),
            Role::Consumer => format!("consumer-{}", self.id),
        }
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.role, self.id)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    Produced(Item),
    Consumed(Item),
    /// The worker left its loop after moving `transferred` items.
    Stopped { transferred: u64 },
}

/// One line of the worker event stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub worker: WorkerId,
    pub kind: EventKind,
}

impl Event {
    pub fn produced(id: usize, item: Item) -> Self {
        Self {
            worker: WorkerId::producer(id),
            kind: EventKind::Produced(item),
        }
    }

    pub fn consumed(id: usize, item: Item) -> Self {
        Self {
            worker: WorkerId::consumer(id),
            kind: EventKind::Consumed(item),
        }
    }

    pub fn stopped(worker: WorkerId, transferred: u64) -> Self {
        Self {
            worker,
            kind: EventKind::Stopped { transferred },
        }
    }

    /// The item moved by this event, if it is a transfer.
    pub fn item(&self) -> Option<Item> {
        match self.kind {
            EventKind::Produced(item) | EventKind::Consumed(item) => Some(item),
            EventKind::Stopped { .. } => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EventKind::Produced(item) => write!(f, "{} produced: {}", self.worker, item),
            EventKind::Consumed(item) => write!(f, "{} consumed: {}", self.worker, item),
            EventKind::Stopped { transferred } => {
                write!(f, "{} stopped after {} items", self.worker, transferred)
            }
        }
    }
}

/// What a worker reports when its thread is joined.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker: WorkerId,
    pub transferred: u64,
}
