//! Narration error types.

use std::time::Duration;
use thiserror::Error;

/// Errors a narration client can report.
///
/// None of these reach the stepper or the user: the gateway turns every
/// one of them into a fallback sentence.
#[derive(Debug, Error)]
pub enum NarrationError {
    /// Transport failure talking to the generator
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The generator answered with a non-success status
    #[error("Generator returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// No API key configured for a provider that needs one
    #[error("No API key configured for the narration provider")]
    MissingApiKey,

    /// The generator did not answer within the configured timeout
    #[error("Narration timed out after {0:?}")]
    Timeout(Duration),

    /// Any other generator-side failure
    #[error("Generator failed: {0}")]
    Generator(String),
}
