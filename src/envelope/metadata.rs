//! Envelope metadata: identity, correlation/causation lineage, identity
//! context, and stream position.
//!
//! Wire shape (optional fields are omitted, never null):
//!
//! ```json
//! {
//!   "id": "<uuid>",
//!   "name": "logical.message.name",
//!   "correlation": { "clientId": "..." },
//!   "causation": ["<uuid>"],
//!   "context": { "userId": "...", "levelOfAssurance": 1, "sessionId": "..." },
//!   "stream": { "streamId": "<uuid>", "version": 3 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValidationError;

/// Immutable envelope header.
///
/// `id` and `name` are mandatory and validated at construction; everything
/// else is optional. Deriving a new metadata from an existing one always
/// goes through [`Metadata::builder_from`] or the enveloper — instances are
/// never mutated in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireMetadata", into = "WireMetadata")]
pub struct Metadata {
    id: Uuid,
    name: String,
    client_correlation_id: Option<String>,
    causation: Vec<Uuid>,
    user_id: Option<String>,
    session_id: Option<String>,
    level_of_assurance: Option<i64>,
    stream_id: Option<Uuid>,
    version: Option<u64>,
}

impl Metadata {
    pub fn builder() -> MetadataBuilder {
        MetadataBuilder::default()
    }

    /// Start a builder pre-populated with every field of an existing
    /// metadata, including its id.
    pub fn builder_from(metadata: &Metadata) -> MetadataBuilder {
        MetadataBuilder {
            id: Some(metadata.id),
            name: Some(metadata.name.clone()),
            client_correlation_id: metadata.client_correlation_id.clone(),
            causation: metadata.causation.clone(),
            user_id: metadata.user_id.clone(),
            session_id: metadata.session_id.clone(),
            level_of_assurance: metadata.level_of_assurance,
            stream_id: metadata.stream_id,
            version: metadata.version,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The logical message name used for routing.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn client_correlation_id(&self) -> Option<&str> {
        self.client_correlation_id.as_deref()
    }

    /// Ids of envelopes that causally precede this one, oldest first.
    pub fn causation(&self) -> &[Uuid] {
        &self.causation
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn level_of_assurance(&self) -> Option<i64> {
        self.level_of_assurance
    }

    pub fn stream_id(&self) -> Option<Uuid> {
        self.stream_id
    }

    pub fn version(&self) -> Option<u64> {
        self.version
    }

    /// Derive a copy of this metadata re-pointed at a stream position.
    ///
    /// Used by the event stream when stamping versions at append time; the
    /// id, name, and lineage are unchanged.
    pub fn with_stream(&self, stream_id: Uuid, version: u64) -> Metadata {
        let mut copy = self.clone();
        copy.stream_id = Some(stream_id);
        copy.version = Some(version);
        copy
    }
}

/// Builder for [`Metadata`]. `build` fails immediately when `id` is absent
/// or `name` is absent or empty.
#[derive(Default)]
pub struct MetadataBuilder {
    id: Option<Uuid>,
    name: Option<String>,
    client_correlation_id: Option<String>,
    causation: Vec<Uuid>,
    user_id: Option<String>,
    session_id: Option<String>,
    level_of_assurance: Option<i64>,
    stream_id: Option<Uuid>,
    version: Option<u64>,
}

impl MetadataBuilder {
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_client_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.client_correlation_id = Some(id.into());
        self
    }

    pub fn with_causation(mut self, causation: Vec<Uuid>) -> Self {
        self.causation = causation;
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_level_of_assurance(mut self, level: i64) -> Self {
        self.level_of_assurance = Some(level);
        self
    }

    pub fn with_stream_id(mut self, stream_id: Uuid) -> Self {
        self.stream_id = Some(stream_id);
        self
    }

    pub fn with_version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn build(self) -> Result<Metadata, ValidationError> {
        let id = self.id.ok_or(ValidationError::MissingId)?;
        let name = self.name.ok_or(ValidationError::MissingName)?;
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        Ok(Metadata {
            id,
            name,
            client_correlation_id: self.client_correlation_id,
            causation: self.causation,
            user_id: self.user_id,
            session_id: self.session_id,
            level_of_assurance: self.level_of_assurance,
            stream_id: self.stream_id,
            version: self.version,
        })
    }
}

// Wire representation. Kept separate from `Metadata` so both construction
// paths (builder and deserialization) funnel through the same validation,
// and so optional groups serialize as omitted objects rather than nulls.

#[derive(Serialize, Deserialize)]
struct WireMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    correlation: Option<WireCorrelation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    causation: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<WireContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stream: Option<WireStream>,
}

#[derive(Serialize, Deserialize)]
struct WireCorrelation {
    #[serde(rename = "clientId", default, skip_serializing_if = "Option::is_none")]
    client_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct WireContext {
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(
        rename = "levelOfAssurance",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    level_of_assurance: Option<i64>,
    #[serde(rename = "sessionId", default, skip_serializing_if = "Option::is_none")]
    session_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct WireStream {
    #[serde(rename = "streamId", default, skip_serializing_if = "Option::is_none")]
    stream_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<u64>,
}

impl TryFrom<WireMetadata> for Metadata {
    type Error = ValidationError;

    fn try_from(wire: WireMetadata) -> Result<Self, Self::Error> {
        let mut builder = Metadata::builder().with_causation(wire.causation);

        if let Some(id) = wire.id {
            let id = Uuid::parse_str(&id).map_err(|_| ValidationError::MalformedId(id))?;
            builder = builder.with_id(id);
        }
        if let Some(name) = wire.name {
            builder = builder.with_name(name);
        }
        if let Some(client_id) = wire.correlation.and_then(|c| c.client_id) {
            builder = builder.with_client_correlation_id(client_id);
        }
        if let Some(context) = wire.context {
            if let Some(user_id) = context.user_id {
                builder = builder.with_user_id(user_id);
            }
            if let Some(level) = context.level_of_assurance {
                builder = builder.with_level_of_assurance(level);
            }
            if let Some(session_id) = context.session_id {
                builder = builder.with_session_id(session_id);
            }
        }
        if let Some(stream) = wire.stream {
            if let Some(stream_id) = stream.stream_id {
                builder = builder.with_stream_id(stream_id);
            }
            if let Some(version) = stream.version {
                builder = builder.with_version(version);
            }
        }

        builder.build()
    }
}

impl From<Metadata> for WireMetadata {
    fn from(metadata: Metadata) -> Self {
        let correlation = metadata
            .client_correlation_id
            .map(|client_id| WireCorrelation {
                client_id: Some(client_id),
            });

        let context = if metadata.user_id.is_some()
            || metadata.level_of_assurance.is_some()
            || metadata.session_id.is_some()
        {
            Some(WireContext {
                user_id: metadata.user_id,
                level_of_assurance: metadata.level_of_assurance,
                session_id: metadata.session_id,
            })
        } else {
            None
        };

        let stream = if metadata.stream_id.is_some() || metadata.version.is_some() {
            Some(WireStream {
                stream_id: metadata.stream_id,
                version: metadata.version,
            })
        } else {
            None
        };

        WireMetadata {
            id: Some(metadata.id.to_string()),
            name: Some(metadata.name),
            correlation,
            causation: metadata.causation,
            context,
            stream,
        }
    }
}
