mod enveloper;
mod error;

pub use enveloper::{EnvelopeBuilder, Enveloper};
pub use error::EnveloperError;
