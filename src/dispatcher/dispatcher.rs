//! Name-based dispatch over the component-partitioned handler registry.
//!
//! Build a [`HandlerRegistry`] once at startup, wrap it in a
//! [`DispatcherCache`], and hand per-kind dispatchers to whatever owns the
//! inbound message flow.

use std::array;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::envelope::JsonEnvelope;
use crate::interceptor::{DispatchTarget, InterceptorContext};

use super::error::DispatchError;
use super::registry::{ComponentKind, Handler, HandlerRegistry};

/// Routes envelopes to the single handler registered for their logical name
/// within one component partition.
pub struct Dispatcher {
    kind: ComponentKind,
    handlers: Arc<HashMap<String, Handler>>,
}

impl Dispatcher {
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Look up the handler for the envelope's name and invoke it.
    ///
    /// An unregistered name is a configuration defect, reported as
    /// [`DispatchError::UnsupportedMessage`] and never retried.
    pub fn dispatch(&self, envelope: &JsonEnvelope) -> Result<Option<JsonEnvelope>, DispatchError> {
        let name = envelope.metadata().name();
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| DispatchError::UnsupportedMessage {
                kind: self.kind,
                name: name.to_string(),
            })?;

        debug!(kind = %self.kind, name, id = %envelope.metadata().id(), "dispatching envelope");
        handler(envelope)
    }
}

impl DispatchTarget for Dispatcher {
    fn process(&self, mut context: InterceptorContext) -> Result<InterceptorContext, DispatchError> {
        if let Some(output) = self.dispatch(context.input_envelope())? {
            context.set_output(output);
        }
        Ok(context)
    }
}

/// Lazily builds one [`Dispatcher`] per component kind.
///
/// Each dispatcher is constructed on first request and immutable thereafter
/// — safe for unsynchronized concurrent reads.
pub struct DispatcherCache {
    registry: HandlerRegistry,
    dispatchers: [OnceLock<Arc<Dispatcher>>; ComponentKind::ALL.len()],
}

impl DispatcherCache {
    pub fn new(registry: HandlerRegistry) -> Self {
        DispatcherCache {
            registry,
            dispatchers: array::from_fn(|_| OnceLock::new()),
        }
    }

    /// The dispatcher bound to one component kind's partition.
    pub fn dispatcher_for(&self, kind: ComponentKind) -> Arc<Dispatcher> {
        let dispatcher = self.dispatchers[kind.index()].get_or_init(|| {
            Arc::new(Dispatcher {
                kind,
                handlers: self.registry.partition(kind),
            })
        });
        Arc::clone(dispatcher)
    }
}
