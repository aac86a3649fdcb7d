mod dispatcher;
mod error;
mod registry;

pub use dispatcher::{Dispatcher, DispatcherCache};
pub use error::{DispatchError, RegistryError};
pub use registry::{ComponentKind, Handler, HandlerRegistry, HandlerRegistryBuilder};
