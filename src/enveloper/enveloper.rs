//! Outbound envelope derivation.
//!
//! Handlers produce raw payload values; the enveloper wraps them in fresh
//! envelopes whose metadata is inherited from the envelope that caused them:
//!
//! ```ignore
//! let mut enveloper = Enveloper::new();
//! enveloper.register::<OrderPlaced>("orders.order-placed");
//!
//! let event = enveloper
//!     .envelop(OrderPlaced { order_id })
//!     .with_metadata_from(&command)?;
//! ```

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use uuid::Uuid;

use crate::envelope::{Envelope, Metadata};

use super::error::EnveloperError;

/// Derives outbound envelopes from payloads and a causing envelope.
///
/// Holds the payload-type → logical-name registry. Registration is a
/// startup-time configuration action; after wiring, the enveloper is
/// read-only and safe to share.
#[derive(Default)]
pub struct Enveloper {
    names: HashMap<TypeId, String>,
}

impl Enveloper {
    pub fn new() -> Self {
        Enveloper::default()
    }

    /// Record the logical outbound name for a payload type.
    ///
    /// Re-registering the same type overwrites — last registration wins.
    pub fn register<T: 'static>(&mut self, name: impl Into<String>) {
        self.names.insert(TypeId::of::<T>(), name.into());
    }

    /// The registered name for a payload type, if any.
    pub fn name_for<T: 'static>(&self) -> Option<&str> {
        self.names.get(&TypeId::of::<T>()).map(|s| s.as_str())
    }

    /// Begin deriving an outbound envelope for `payload`.
    pub fn envelop<T>(&self, payload: T) -> EnvelopeBuilder<'_, T> {
        EnvelopeBuilder {
            enveloper: self,
            payload,
            name: None,
            stream: None,
        }
    }
}

/// Fluent builder produced by [`Enveloper::envelop`]; terminated by
/// [`EnvelopeBuilder::with_metadata_from`].
pub struct EnvelopeBuilder<'a, T> {
    enveloper: &'a Enveloper,
    payload: T,
    name: Option<String>,
    stream: Option<(Uuid, u64)>,
}

impl<'a, T: 'static> EnvelopeBuilder<'a, T> {
    /// Set the outbound name explicitly instead of resolving it from the
    /// payload-type registry.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Carry explicit stream fields on the derived envelope.
    ///
    /// The enveloper never assigns stream positions on its own — that is
    /// the event stream's job at append time.
    pub fn with_stream(mut self, stream_id: Uuid, version: u64) -> Self {
        self.stream = Some((stream_id, version));
        self
    }

    /// Build the envelope, inheriting metadata from `causing`.
    ///
    /// The result carries a fresh id, the causing envelope's correlation and
    /// identity context, and a causation chain equal to the causing chain
    /// with the causing envelope's own id appended.
    pub fn with_metadata_from<C>(self, causing: &Envelope<C>) -> Result<Envelope<T>, EnveloperError> {
        let name = match self.name {
            Some(name) => name,
            None => self
                .enveloper
                .name_for::<T>()
                .map(String::from)
                .ok_or(EnveloperError::UnregisteredPayloadType(type_name::<T>()))?,
        };

        let caused_by = causing.metadata();
        let mut causation = caused_by.causation().to_vec();
        causation.push(caused_by.id());

        let mut builder = Metadata::builder()
            .with_id(Uuid::new_v4())
            .with_name(name)
            .with_causation(causation);

        if let Some(client_id) = caused_by.client_correlation_id() {
            builder = builder.with_client_correlation_id(client_id);
        }
        if let Some(user_id) = caused_by.user_id() {
            builder = builder.with_user_id(user_id);
        }
        if let Some(session_id) = caused_by.session_id() {
            builder = builder.with_session_id(session_id);
        }
        if let Some(level) = caused_by.level_of_assurance() {
            builder = builder.with_level_of_assurance(level);
        }
        if let Some((stream_id, version)) = self.stream {
            builder = builder.with_stream_id(stream_id).with_version(version);
        }

        Ok(Envelope::new(builder.build()?, self.payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::JsonEnvelope;
    use serde_json::json;

    struct OrderPlaced;
    struct OrderCancelled;

    fn causing_envelope() -> JsonEnvelope {
        let metadata = Metadata::builder()
            .with_id(Uuid::new_v4())
            .with_name("orders.place-order")
            .with_client_correlation_id("corr-1")
            .with_causation(vec![Uuid::new_v4()])
            .with_user_id("user-1")
            .with_session_id("session-1")
            .with_level_of_assurance(2)
            .with_stream_id(Uuid::new_v4())
            .with_version(4)
            .build()
            .unwrap();
        Envelope::new(metadata, json!({}))
    }

    #[test]
    fn explicit_name() {
        let enveloper = Enveloper::new();
        let causing = causing_envelope();

        let envelope = enveloper
            .envelop(OrderPlaced)
            .with_name("orders.order-placed")
            .with_metadata_from(&causing)
            .unwrap();

        assert_eq!(envelope.metadata().name(), "orders.order-placed");
    }

    #[test]
    fn registered_name() {
        let mut enveloper = Enveloper::new();
        enveloper.register::<OrderPlaced>("orders.order-placed");
        let causing = causing_envelope();

        let envelope = enveloper
            .envelop(OrderPlaced)
            .with_metadata_from(&causing)
            .unwrap();

        assert_eq!(envelope.metadata().name(), "orders.order-placed");
    }

    #[test]
    fn last_registration_wins() {
        let mut enveloper = Enveloper::new();
        enveloper.register::<OrderPlaced>("orders.order-placed");
        enveloper.register::<OrderPlaced>("orders.order-placed-v2");

        assert_eq!(
            enveloper.name_for::<OrderPlaced>(),
            Some("orders.order-placed-v2")
        );
    }

    #[test]
    fn unregistered_type_fails() {
        let enveloper = Enveloper::new();
        let causing = causing_envelope();

        let result = enveloper
            .envelop(OrderCancelled)
            .with_metadata_from(&causing);

        match result {
            Err(EnveloperError::UnregisteredPayloadType(type_name)) => {
                assert!(type_name.contains("OrderCancelled"));
            }
            other => panic!("expected UnregisteredPayloadType, got {:?}", other.err()),
        }
    }

    #[test]
    fn causation_is_causing_chain_plus_causing_id() {
        let enveloper = Enveloper::new();
        let causing = causing_envelope();

        let envelope = enveloper
            .envelop(OrderPlaced)
            .with_name("orders.order-placed")
            .with_metadata_from(&causing)
            .unwrap();

        let mut expected = causing.metadata().causation().to_vec();
        expected.push(causing.metadata().id());
        assert_eq!(envelope.metadata().causation(), expected.as_slice());
        assert_ne!(envelope.metadata().id(), causing.metadata().id());
    }

    #[test]
    fn correlation_and_context_copied() {
        let enveloper = Enveloper::new();
        let causing = causing_envelope();

        let envelope = enveloper
            .envelop(OrderPlaced)
            .with_name("orders.order-placed")
            .with_metadata_from(&causing)
            .unwrap();

        let metadata = envelope.metadata();
        assert_eq!(metadata.client_correlation_id(), Some("corr-1"));
        assert_eq!(metadata.user_id(), Some("user-1"));
        assert_eq!(metadata.session_id(), Some("session-1"));
        assert_eq!(metadata.level_of_assurance(), Some(2));
    }

    #[test]
    fn stream_fields_not_inherited() {
        let enveloper = Enveloper::new();
        let causing = causing_envelope();

        let envelope = enveloper
            .envelop(OrderPlaced)
            .with_name("orders.order-placed")
            .with_metadata_from(&causing)
            .unwrap();

        assert_eq!(envelope.metadata().stream_id(), None);
        assert_eq!(envelope.metadata().version(), None);
    }

    #[test]
    fn stream_fields_carried_when_explicit() {
        let enveloper = Enveloper::new();
        let causing = causing_envelope();
        let stream_id = Uuid::new_v4();

        let envelope = enveloper
            .envelop(OrderPlaced)
            .with_name("orders.order-placed")
            .with_stream(stream_id, 12)
            .with_metadata_from(&causing)
            .unwrap();

        assert_eq!(envelope.metadata().stream_id(), Some(stream_id));
        assert_eq!(envelope.metadata().version(), Some(12));
    }

    #[test]
    fn explicit_empty_name_fails_validation() {
        let enveloper = Enveloper::new();
        let causing = causing_envelope();

        let result = enveloper
            .envelop(OrderPlaced)
            .with_name("")
            .with_metadata_from(&causing);

        assert!(matches!(result, Err(EnveloperError::InvalidMetadata(_))));
    }
}
