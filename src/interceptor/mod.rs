mod chain;
mod context;
mod logging;

pub use chain::{DispatchTarget, Interceptor, InterceptorChain, InterceptorChainProcessor};
pub use context::InterceptorContext;
pub use logging::LoggingInterceptor;
