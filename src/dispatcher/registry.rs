use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::envelope::JsonEnvelope;

use super::error::{DispatchError, RegistryError};

/// Partition of handlers by service-component role.
///
/// Each kind is an independent namespace: a command handler and a query view
/// may both claim the same message name without colliding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    CommandHandler,
    QueryView,
    EventListener,
    EventProcessor,
}

impl ComponentKind {
    pub(crate) const ALL: [ComponentKind; 4] = [
        ComponentKind::CommandHandler,
        ComponentKind::QueryView,
        ComponentKind::EventListener,
        ComponentKind::EventProcessor,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            ComponentKind::CommandHandler => 0,
            ComponentKind::QueryView => 1,
            ComponentKind::EventListener => 2,
            ComponentKind::EventProcessor => 3,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ComponentKind::CommandHandler => "command_handler",
            ComponentKind::QueryView => "query_view",
            ComponentKind::EventListener => "event_listener",
            ComponentKind::EventProcessor => "event_processor",
        };
        write!(f, "{}", label)
    }
}

/// A handler function bound to one logical message name.
///
/// Returns an output envelope, or `None` for fire-and-forget handlers such
/// as event listeners.
pub type Handler =
    Box<dyn Fn(&JsonEnvelope) -> Result<Option<JsonEnvelope>, DispatchError> + Send + Sync>;

/// Immutable `(component kind, message name) → handler` table.
///
/// Built once at process start from explicit registrations; read-only and
/// safe for unsynchronized concurrent access thereafter.
pub struct HandlerRegistry {
    partitions: HashMap<ComponentKind, Arc<HashMap<String, Handler>>>,
}

impl HandlerRegistry {
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::default()
    }

    /// The name → handler table for one component kind. A kind with no
    /// registrations yields an empty table, not an error.
    pub(crate) fn partition(&self, kind: ComponentKind) -> Arc<HashMap<String, Handler>> {
        self.partitions.get(&kind).cloned().unwrap_or_default()
    }
}

/// Collects registrations, then validates them as a whole.
///
/// Duplicate `(kind, name)` pairs are a configuration defect reported by
/// `build`, never discovered later at dispatch time.
#[derive(Default)]
pub struct HandlerRegistryBuilder {
    entries: Vec<(ComponentKind, String, Handler)>,
}

impl HandlerRegistryBuilder {
    pub fn register<F>(mut self, kind: ComponentKind, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&JsonEnvelope) -> Result<Option<JsonEnvelope>, DispatchError>
            + Send
            + Sync
            + 'static,
    {
        self.entries.push((kind, name.into(), Box::new(handler)));
        self
    }

    pub fn build(self) -> Result<HandlerRegistry, RegistryError> {
        let mut partitions: HashMap<ComponentKind, HashMap<String, Handler>> = HashMap::new();

        for (kind, name, handler) in self.entries {
            let partition = partitions.entry(kind).or_default();
            if partition.contains_key(&name) {
                return Err(RegistryError::DuplicateHandler { kind, name });
            }
            partition.insert(name, handler);
        }

        Ok(HandlerRegistry {
            partitions: partitions
                .into_iter()
                .map(|(kind, handlers)| (kind, Arc::new(handlers)))
                .collect(),
        })
    }
}
