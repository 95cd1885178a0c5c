//! Reply drafting: prompt construction and the text-generation capability.
//!
//! The workflow only depends on [`TextGenerator`]; [`GeminiClient`] is the
//! production implementation backed by the `generateContent` REST endpoint.

pub mod error;
pub mod gemini;
pub mod generator;
pub mod prompt;

pub use error::GenerateError;
pub use gemini::GeminiClient;
pub use generator::TextGenerator;
pub use prompt::{build_reply_prompt, CONCERN_CLAUSE};
