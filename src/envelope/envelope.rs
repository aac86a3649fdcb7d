use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::metadata::Metadata;

/// Immutable wrapper pairing one [`Metadata`] with one payload value.
///
/// The payload type is opaque to the envelope; interpretation belongs to the
/// handler resolved for `metadata.name()`. On the wire an envelope is a JSON
/// object with exactly two members, `metadata` and `payload`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    metadata: Metadata,
    payload: T,
}

/// Envelope carrying an uninterpreted JSON payload — the form messages take
/// at the dispatch boundary, before a handler decodes them.
pub type JsonEnvelope = Envelope<Value>;

impl<T> Envelope<T> {
    pub fn new(metadata: Metadata, payload: T) -> Self {
        Envelope { metadata, payload }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn into_parts(self) -> (Metadata, T) {
        (self.metadata, self.payload)
    }
}
