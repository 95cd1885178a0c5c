//! HTTP client for the GMB dashboard backend.
//!
//! Covers the three endpoints the review-reply dashboard uses: location
//! lookup, review listing and reply submission. Requests are single-shot;
//! nothing here retries.

pub mod client;
pub mod error;

pub use client::GmbClient;
pub use error::ClientError;
