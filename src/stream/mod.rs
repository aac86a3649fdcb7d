mod error;
mod event_stream;
mod in_memory;
mod store;

pub use error::StreamError;
pub use event_stream::{EventSource, EventStream};
pub use in_memory::InMemoryEventStore;
pub use store::{EventStore, Tolerance};
