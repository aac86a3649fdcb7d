mod dispatcher;
mod envelope;
mod enveloper;
mod interceptor;
mod stream;

pub use dispatcher::{
    ComponentKind, DispatchError, Dispatcher, DispatcherCache, Handler, HandlerRegistry,
    HandlerRegistryBuilder, RegistryError,
};
pub use envelope::{Envelope, JsonEnvelope, Metadata, MetadataBuilder, ValidationError};
pub use enveloper::{EnvelopeBuilder, Enveloper, EnveloperError};
pub use interceptor::{
    DispatchTarget, Interceptor, InterceptorChain, InterceptorChainProcessor, InterceptorContext,
    LoggingInterceptor,
};
pub use stream::{EventSource, EventStore, EventStream, InMemoryEventStore, StreamError, Tolerance};
