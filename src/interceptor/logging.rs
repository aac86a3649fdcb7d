use tracing::debug;

use crate::dispatcher::DispatchError;

use super::chain::{Interceptor, InterceptorChain};
use super::context::InterceptorContext;

/// Cross-cutting step that traces envelopes entering and leaving the chain.
///
/// Always proceeds; never short-circuits.
pub struct LoggingInterceptor;

impl Interceptor for LoggingInterceptor {
    fn process(
        &self,
        context: InterceptorContext,
        chain: &mut InterceptorChain<'_>,
    ) -> Result<InterceptorContext, DispatchError> {
        {
            let metadata = context.input_envelope().metadata();
            debug!(name = metadata.name(), id = %metadata.id(), "envelope entering chain");
        }

        let context = chain.process_next(context)?;

        match context.output_envelope() {
            Some(output) => {
                let metadata = output.metadata();
                debug!(name = metadata.name(), id = %metadata.id(), "envelope leaving chain");
            }
            None => debug!("chain completed without output envelope"),
        }

        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{Envelope, Metadata};
    use crate::interceptor::{DispatchTarget, InterceptorChainProcessor};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use uuid::Uuid;

    struct CountingTarget {
        calls: Arc<AtomicUsize>,
    }

    impl DispatchTarget for CountingTarget {
        fn process(
            &self,
            context: InterceptorContext,
        ) -> Result<InterceptorContext, DispatchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(context)
        }
    }

    #[test]
    fn always_proceeds() {
        let calls = Arc::new(AtomicUsize::new(0));
        let processor = InterceptorChainProcessor::new(
            vec![Arc::new(LoggingInterceptor)],
            Box::new(CountingTarget {
                calls: Arc::clone(&calls),
            }),
        );

        let metadata = Metadata::builder()
            .with_id(Uuid::new_v4())
            .with_name("orders.place-order")
            .build()
            .unwrap();
        processor.process(Envelope::new(metadata, json!({}))).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
