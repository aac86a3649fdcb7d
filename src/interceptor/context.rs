use std::collections::HashMap;

use serde_json::Value;

use crate::envelope::JsonEnvelope;

/// Mutable, request-scoped state threaded through one interceptor chain
/// invocation.
///
/// Wraps the input envelope plus a key/value bag interceptors use to pass
/// derived data (resolved claims, enrichment results) down the chain without
/// touching the envelope itself. Exclusively owned by the single in-flight
/// invocation — never shared across concurrent dispatches.
pub struct InterceptorContext {
    input: JsonEnvelope,
    output: Option<JsonEnvelope>,
    bag: HashMap<String, Value>,
}

impl InterceptorContext {
    pub fn with_input(input: JsonEnvelope) -> Self {
        InterceptorContext {
            input,
            output: None,
            bag: HashMap::new(),
        }
    }

    pub fn input_envelope(&self) -> &JsonEnvelope {
        &self.input
    }

    /// The chain's result, if any. Absent for fire-and-forget targets or
    /// when an interceptor suppressed output.
    pub fn output_envelope(&self) -> Option<&JsonEnvelope> {
        self.output.as_ref()
    }

    pub fn set_output(&mut self, envelope: JsonEnvelope) {
        self.output = Some(envelope);
    }

    pub fn into_output(self) -> Option<JsonEnvelope> {
        self.output
    }

    /// Stash a derived value for interceptors further down the chain.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.bag.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.bag.get(key)
    }
}
