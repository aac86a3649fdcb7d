use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;
use uuid::Uuid;

use crate::envelope::{Envelope, JsonEnvelope};

use super::error::StreamError;
use super::store::{EventStore, Tolerance};

#[derive(Default)]
struct StreamLog {
    version: u64,
    events: Vec<JsonEnvelope>,
}

/// In-memory [`EventStore`].
///
/// One write-guard section is the atomic compare-and-advance unit: the
/// expected-version check, version stamping, and persistence all happen
/// under a single lock acquisition, so concurrent commits against the same
/// stream serialize and can never claim the same version.
#[derive(Clone, Default)]
pub struct InMemoryEventStore {
    streams: Arc<RwLock<HashMap<Uuid, StreamLog>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        InMemoryEventStore::default()
    }
}

impl EventStore for InMemoryEventStore {
    fn load(&self, stream_id: Uuid) -> Result<(u64, Vec<JsonEnvelope>), StreamError> {
        let streams = self
            .streams
            .read()
            .map_err(|_| StreamError::LockPoisoned("read"))?;

        Ok(streams
            .get(&stream_id)
            .map(|log| (log.version, log.events.clone()))
            .unwrap_or((0, Vec::new())))
    }

    fn commit(
        &self,
        stream_id: Uuid,
        expected_version: u64,
        tolerance: Tolerance,
        events: Vec<JsonEnvelope>,
    ) -> Result<u64, StreamError> {
        let mut streams = self
            .streams
            .write()
            .map_err(|_| StreamError::LockPoisoned("write"))?;
        let current = streams.get(&stream_id).map_or(0, |log| log.version);

        let conflict = match tolerance {
            Tolerance::Strict => expected_version != current,
            // A trailing view is tolerated; claiming a version ahead of the
            // stream is not.
            Tolerance::NonConsecutive => expected_version > current,
        };
        if conflict {
            return Err(StreamError::VersionConflict {
                stream_id,
                expected: expected_version,
                actual: current,
            });
        }
        if events.is_empty() {
            return Ok(current);
        }

        let log = streams.entry(stream_id).or_default();
        let appended = events.len();
        for envelope in events {
            let (metadata, payload) = envelope.into_parts();
            let version = log.version + 1;
            log.events
                .push(Envelope::new(metadata.with_stream(stream_id, version), payload));
            log.version = version;
        }

        debug!(stream_id = %stream_id, appended, version = log.version, "events appended");
        Ok(log.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Metadata;
    use serde_json::json;

    fn event(name: &str) -> JsonEnvelope {
        let metadata = Metadata::builder()
            .with_id(Uuid::new_v4())
            .with_name(name)
            .build()
            .unwrap();
        Envelope::new(metadata, json!({}))
    }

    #[test]
    fn unknown_stream_loads_empty_at_version_zero() {
        let store = InMemoryEventStore::new();
        let (version, events) = store.load(Uuid::new_v4()).unwrap();
        assert_eq!(version, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn first_commit_assigns_one_two_three() {
        let store = InMemoryEventStore::new();
        let stream_id = Uuid::new_v4();

        let version = store
            .commit(
                stream_id,
                0,
                Tolerance::Strict,
                vec![event("e1"), event("e2"), event("e3")],
            )
            .unwrap();
        assert_eq!(version, 3);

        let (version, events) = store.load(stream_id).unwrap();
        assert_eq!(version, 3);
        let versions: Vec<_> = events.iter().map(|e| e.metadata().version()).collect();
        assert_eq!(versions, vec![Some(1), Some(2), Some(3)]);
        assert!(events
            .iter()
            .all(|e| e.metadata().stream_id() == Some(stream_id)));
    }

    #[test]
    fn stamping_preserves_envelope_identity() {
        let store = InMemoryEventStore::new();
        let stream_id = Uuid::new_v4();
        let original = event("orders.order-placed");
        let id = original.metadata().id();

        store
            .commit(stream_id, 0, Tolerance::Strict, vec![original])
            .unwrap();

        let (_, events) = store.load(stream_id).unwrap();
        assert_eq!(events[0].metadata().id(), id);
        assert_eq!(events[0].metadata().name(), "orders.order-placed");
    }

    #[test]
    fn strict_rejects_stale_expected_version() {
        let store = InMemoryEventStore::new();
        let stream_id = Uuid::new_v4();

        store
            .commit(
                stream_id,
                0,
                Tolerance::Strict,
                vec![event("e1"), event("e2"), event("e3")],
            )
            .unwrap();
        // another writer advances the stream to 4
        store
            .commit(stream_id, 3, Tolerance::Strict, vec![event("e4")])
            .unwrap();

        let result = store.commit(stream_id, 3, Tolerance::Strict, vec![event("e5")]);
        assert_eq!(
            result,
            Err(StreamError::VersionConflict {
                stream_id,
                expected: 3,
                actual: 4,
            })
        );
    }

    #[test]
    fn non_consecutive_tolerates_trailing_view() {
        let store = InMemoryEventStore::new();
        let stream_id = Uuid::new_v4();

        store
            .commit(
                stream_id,
                0,
                Tolerance::Strict,
                vec![event("e1"), event("e2"), event("e3")],
            )
            .unwrap();
        store
            .commit(stream_id, 3, Tolerance::Strict, vec![event("e4")])
            .unwrap();

        // same stale base as the strict failure above, tolerated here
        let version = store
            .commit(
                stream_id,
                3,
                Tolerance::NonConsecutive,
                vec![event("e5"), event("e6"), event("e7")],
            )
            .unwrap();
        assert_eq!(version, 7);

        let (_, events) = store.load(stream_id).unwrap();
        let versions: Vec<_> = events.iter().map(|e| e.metadata().version().unwrap()).collect();
        assert_eq!(versions, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn non_consecutive_rejects_future_expected_version() {
        let store = InMemoryEventStore::new();
        let stream_id = Uuid::new_v4();

        let result = store.commit(stream_id, 2, Tolerance::NonConsecutive, vec![event("e1")]);
        assert_eq!(
            result,
            Err(StreamError::VersionConflict {
                stream_id,
                expected: 2,
                actual: 0,
            })
        );
    }

    #[test]
    fn rejected_commit_leaves_the_store_untouched() {
        let store = InMemoryEventStore::new();
        let stream_id = Uuid::new_v4();

        let result = store.commit(stream_id, 2, Tolerance::Strict, vec![event("e1")]);
        assert!(result.is_err());
        assert!(store.streams.read().unwrap().is_empty());

        // an accepted no-op leaves no trace either
        store.commit(stream_id, 0, Tolerance::Strict, vec![]).unwrap();
        assert!(store.streams.read().unwrap().is_empty());
    }

    #[test]
    fn empty_commit_is_a_checked_no_op() {
        let store = InMemoryEventStore::new();
        let stream_id = Uuid::new_v4();

        assert_eq!(store.commit(stream_id, 0, Tolerance::Strict, vec![]), Ok(0));
        assert_eq!(
            store.commit(stream_id, 1, Tolerance::Strict, vec![]),
            Err(StreamError::VersionConflict {
                stream_id,
                expected: 1,
                actual: 0,
            })
        );
    }
}
