use std::error::Error;
use std::fmt;

use super::registry::ComponentKind;

/// Error raised while building a handler registry.
///
/// Detected at build time, never at dispatch time. Not retryable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// Two handlers were registered for the same name within one component
    /// partition.
    DuplicateHandler { kind: ComponentKind, name: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateHandler { kind, name } => {
                write!(f, "duplicate handler for {} message {}", kind, name)
            }
        }
    }
}

impl Error for RegistryError {}

/// Error type for dispatch and interceptor-chain processing.
#[derive(Debug)]
pub enum DispatchError {
    /// No handler registered for the message name in the requested component
    /// partition. A configuration defect — never retried.
    UnsupportedMessage { kind: ComponentKind, name: String },
    /// A handler's own failure, propagated unchanged.
    Handler(Box<dyn Error + Send + Sync>),
}

impl DispatchError {
    /// Wrap a handler failure for propagation through the chain.
    pub fn handler(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        DispatchError::Handler(err.into())
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::UnsupportedMessage { kind, name } => {
                write!(f, "no {} handler registered for message {}", kind, name)
            }
            DispatchError::Handler(e) => write!(f, "handler failed: {}", e),
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DispatchError::Handler(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}
