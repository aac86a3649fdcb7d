use uuid::Uuid;

use crate::envelope::JsonEnvelope;

use super::error::StreamError;

/// Optimistic-concurrency policy for appends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tolerance {
    /// The caller's expected version must exactly equal the stream's true
    /// current version at commit time — no other writer may have appended
    /// between the caller's read and write.
    Strict,
    /// The caller's view may trail the stream's true current version, as
    /// happens when a saga and a handler append interleaved events to the
    /// same logical stream. Versions are assigned from the true current
    /// version, so no version number is ever reused.
    NonConsecutive,
}

/// Persistence collaborator: a durable append-only log per stream id.
///
/// Implementations must make `commit` a single atomic unit — expected-version
/// check, version stamping, and persistence together — so two concurrent
/// commits can never be assigned the same version. Serializable isolation is
/// not assumed from any storage layer.
pub trait EventStore: Send + Sync {
    /// Load a stream's current version and its events in order.
    ///
    /// A stream id with no backing entry is an empty stream at version 0,
    /// not an error.
    fn load(&self, stream_id: Uuid) -> Result<(u64, Vec<JsonEnvelope>), StreamError>;

    /// Verify `expected_version` under `tolerance`, stamp each event with
    /// the next consecutive versions after the stream's true current
    /// version, persist them in the given order, and advance the stream.
    ///
    /// Returns the stream's new current version. Within one commit the
    /// assigned versions are strictly increasing and gap-free regardless of
    /// tolerance.
    fn commit(
        &self,
        stream_id: Uuid,
        expected_version: u64,
        tolerance: Tolerance,
        events: Vec<JsonEnvelope>,
    ) -> Result<u64, StreamError>;
}
