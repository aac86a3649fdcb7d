use std::error::Error;
use std::fmt;

use crate::envelope::ValidationError;

/// Error type for outbound envelope derivation.
///
/// Both variants are configuration defects — not retryable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnveloperError {
    /// No explicit name was given and the payload's type was never
    /// registered with the enveloper.
    UnregisteredPayloadType(&'static str),
    /// The derived metadata failed validation (e.g. an explicit empty name).
    InvalidMetadata(ValidationError),
}

impl fmt::Display for EnveloperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnveloperError::UnregisteredPayloadType(type_name) => {
                write!(f, "no name registered for payload type {}", type_name)
            }
            EnveloperError::InvalidMetadata(e) => write!(f, "invalid derived metadata: {}", e),
        }
    }
}

impl Error for EnveloperError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EnveloperError::InvalidMetadata(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for EnveloperError {
    fn from(err: ValidationError) -> Self {
        EnveloperError::InvalidMetadata(err)
    }
}
