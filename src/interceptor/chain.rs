//! Interceptor chain: an ordered pipeline of cross-cutting steps terminated
//! by a dispatch target.
//!
//! Each step receives the context and the rest of the chain as a
//! continuation. Calling [`InterceptorChain::process_next`] proceeds;
//! returning without calling it short-circuits — the remaining interceptors
//! and the target are skipped entirely.

use std::sync::Arc;

use crate::dispatcher::DispatchError;
use crate::envelope::JsonEnvelope;

use super::context::InterceptorContext;

/// A cross-cutting pipeline step.
///
/// Interceptors must be side-effect-idempotent with respect to being retried
/// by the caller; the chain itself never retries.
pub trait Interceptor: Send + Sync {
    fn process(
        &self,
        context: InterceptorContext,
        chain: &mut InterceptorChain<'_>,
    ) -> Result<InterceptorContext, DispatchError>;
}

/// Terminal consumer at the end of a chain — typically a [`Dispatcher`],
/// but any sink will do.
///
/// [`Dispatcher`]: crate::dispatcher::Dispatcher
pub trait DispatchTarget: Send + Sync {
    fn process(&self, context: InterceptorContext) -> Result<InterceptorContext, DispatchError>;
}

impl<T: DispatchTarget + ?Sized> DispatchTarget for Arc<T> {
    fn process(&self, context: InterceptorContext) -> Result<InterceptorContext, DispatchError> {
        (**self).process(context)
    }
}

/// Single-use cursor over an ordered interceptor list plus a terminal
/// target.
///
/// One instance is built per invocation and never reused — no cross-request
/// state leaks through the chain. Ordering is caller-supplied and never
/// reordered or deduplicated.
pub struct InterceptorChain<'a> {
    interceptors: &'a [Arc<dyn Interceptor>],
    target: &'a dyn DispatchTarget,
    position: usize,
}

impl<'a> InterceptorChain<'a> {
    pub fn new(interceptors: &'a [Arc<dyn Interceptor>], target: &'a dyn DispatchTarget) -> Self {
        InterceptorChain {
            interceptors,
            target,
            position: 0,
        }
    }

    /// Invoke the next unvisited interceptor, or the target once the list is
    /// exhausted.
    pub fn process_next(
        &mut self,
        context: InterceptorContext,
    ) -> Result<InterceptorContext, DispatchError> {
        if self.position < self.interceptors.len() {
            let interceptor = Arc::clone(&self.interceptors[self.position]);
            self.position += 1;
            interceptor.process(context, self)
        } else {
            self.target.process(context)
        }
    }
}

/// Owns an ordered interceptor list and a target; builds a fresh single-use
/// chain for every envelope processed.
pub struct InterceptorChainProcessor {
    interceptors: Vec<Arc<dyn Interceptor>>,
    target: Box<dyn DispatchTarget>,
}

impl InterceptorChainProcessor {
    pub fn new(interceptors: Vec<Arc<dyn Interceptor>>, target: Box<dyn DispatchTarget>) -> Self {
        InterceptorChainProcessor {
            interceptors,
            target,
        }
    }

    /// Run the envelope through the chain and return the optional output
    /// envelope produced at the far end.
    pub fn process(&self, envelope: JsonEnvelope) -> Result<Option<JsonEnvelope>, DispatchError> {
        let mut chain = InterceptorChain::new(&self.interceptors, self.target.as_ref());
        let context = chain.process_next(InterceptorContext::with_input(envelope))?;
        Ok(context.into_output())
    }
}
