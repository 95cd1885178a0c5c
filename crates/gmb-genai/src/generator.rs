use std::future::Future;

use crate::error::GenerateError;

/// Single-shot text generation: one prompt in, one string out.
///
/// No streaming, retry or rate limiting is implied.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, GenerateError>> + Send;
}
