//! Generative inference port.

use std::collections::HashMap;
use std::error::Error;
use std::future::Future;
use std::pin::Pin;

/// Boxed future type alias used by [`InferenceClient`] to keep the trait
/// dyn-compatible.
pub type InferenceFuture<'a> = Pin<
    Box<
        dyn Future<Output = Result<HashMap<String, String>, Box<dyn Error + Send + Sync>>>
            + Send
            + 'a,
    >,
>;

/// Guesses canonical identifiers from free-text descriptions.
///
/// The collaborator is not id-aware: input is an ordered list of composite
/// description strings and output maps each description back to an inferred
/// identifier. Omitted descriptions mean "no inference produced". Inferred
/// names carry no correctness guarantee.
pub trait InferenceClient: Send + Sync {
    /// Submits all descriptions as a single batch call.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (network, auth, rate-limit) or
    /// the response cannot be parsed.
    fn infer(&self, descriptions: &[String]) -> InferenceFuture<'_>;
}
