//! Per-stream handles over a backing [`EventStore`].
//!
//! Handlers never mutate streams directly; they hand their events to an
//! [`EventStream`] handle, which appends on their behalf under the
//! optimistic-concurrency contract.

use std::sync::Arc;

use uuid::Uuid;

use crate::envelope::JsonEnvelope;

use super::error::StreamError;
use super::store::{EventStore, Tolerance};

/// Entry point for obtaining stream handles.
pub struct EventSource {
    store: Arc<dyn EventStore>,
}

impl EventSource {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        EventSource { store }
    }

    /// A handle bound to `stream_id`. The stream need not contain events
    /// yet — an empty, never-written stream is a valid zero-version state.
    pub fn stream_of(&self, stream_id: Uuid) -> EventStream {
        EventStream {
            store: Arc::clone(&self.store),
            stream_id,
            current_version: 0,
            events: Vec::new(),
        }
    }
}

/// Handle over one ordered, append-only stream of envelopes.
///
/// Tracks the last version this handle has observed; `append` uses it as the
/// expected base version for the optimistic-concurrency check. On conflict
/// the caller is expected to `read` again, recompute its events, and retry —
/// the handle itself never retries.
pub struct EventStream {
    store: Arc<dyn EventStore>,
    stream_id: Uuid,
    current_version: u64,
    events: Vec<JsonEnvelope>,
}

impl EventStream {
    pub fn stream_id(&self) -> Uuid {
        self.stream_id
    }

    /// The last version this handle has observed — 0 until `read` or a
    /// successful `append`.
    pub fn current_version(&self) -> u64 {
        self.current_version
    }

    /// The events loaded by the last `read` — empty until then. An `append`
    /// does not refresh this view; `read` again to observe the new events.
    pub fn events(&self) -> &[JsonEnvelope] {
        &self.events
    }

    /// Load the stream's events and refresh the handle's version.
    pub fn read(&mut self) -> Result<Vec<JsonEnvelope>, StreamError> {
        let (version, events) = self.store.load(self.stream_id)?;
        self.current_version = version;
        self.events = events.clone();
        Ok(events)
    }

    /// Append `events` after this handle's last-known version.
    ///
    /// On success the handle advances to the stream's new current version,
    /// which is returned.
    pub fn append(
        &mut self,
        events: Vec<JsonEnvelope>,
        tolerance: Tolerance,
    ) -> Result<u64, StreamError> {
        let version =
            self.store
                .commit(self.stream_id, self.current_version, tolerance, events)?;
        self.current_version = version;
        Ok(version)
    }
}
