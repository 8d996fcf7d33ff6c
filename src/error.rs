//! Error types for the bounded buffer and its workers.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BufferError>;

#[derive(Error, Debug)]
pub enum BufferError {
    #[error("Invalid capacity: {capacity} (must be a positive slot count)")]
    InvalidCapacity { capacity: i64 },

    /// The caller's cancel token fired while it was parked. Nothing was transferred.
    #[error("Operation cancelled while waiting for a slot")]
    Cancelled,

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Worker thread '{name}' panicked")]
    WorkerPanicked { name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BufferError {
    pub fn capacity(capacity: impl TryInto<i64>) -> Self {
        Self::InvalidCapacity {
            capacity: capacity.try_into().unwrap_or(i64::MAX),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig { message: message.into() }
    }

    pub fn panicked(name: impl Into<String>) -> Self {
        Self::WorkerPanicked { name: name.into() }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<BufferError> for std::io::Error {
    fn from(e: BufferError) -> Self {
        match e {
            BufferError::Io(inner) => inner,
            other => std::io::Error::other(other),
        }
    }
}
