use std::fmt;

use uuid::Uuid;

/// Error type for event-stream reads and appends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamError {
    /// The caller's expected version did not hold under the active
    /// tolerance. The only retryable class: reload the stream, recompute
    /// the events, and append again.
    VersionConflict {
        stream_id: Uuid,
        expected: u64,
        actual: u64,
    },
    /// Hard failure reported by the backing store. Fatal; not retried.
    Storage(String),
    /// A lock guarding the in-memory store was poisoned.
    LockPoisoned(&'static str),
}

impl StreamError {
    /// Whether the caller may retry after reloading the stream. Only
    /// version conflicts qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StreamError::VersionConflict { .. })
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::VersionConflict {
                stream_id,
                expected,
                actual,
            } => write!(
                f,
                "version conflict on stream {} (expected {}, actual {})",
                stream_id, expected, actual
            ),
            StreamError::Storage(msg) => write!(f, "storage failure: {}", msg),
            StreamError::LockPoisoned(operation) => {
                write!(f, "event store lock poisoned during {}", operation)
            }
        }
    }
}

impl std::error::Error for StreamError {}
