mod envelope;
mod error;
mod metadata;

pub use envelope::{Envelope, JsonEnvelope};
pub use error::ValidationError;
pub use metadata::{Metadata, MetadataBuilder};
