use std::fmt;

/// Error raised when required metadata fields are missing or malformed.
///
/// Raised at construction, never at use time. Not retryable — a validation
/// failure indicates a defect in the producer of the envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// The `id` field is absent or null.
    MissingId,
    /// The `id` field is not a well-formed UUID.
    MalformedId(String),
    /// The `name` field is absent or null.
    MissingName,
    /// The `name` field is present but empty.
    EmptyName,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingId => write!(f, "metadata id is missing"),
            ValidationError::MalformedId(id) => {
                write!(f, "metadata id is not a valid UUID: {}", id)
            }
            ValidationError::MissingName => write!(f, "metadata name is missing"),
            ValidationError::EmptyName => write!(f, "metadata name is empty"),
        }
    }
}

impl std::error::Error for ValidationError {}
