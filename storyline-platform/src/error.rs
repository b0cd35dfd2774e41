//! Error types for storyline-platform.

use thiserror::Error;

/// Failures constructing the HTTP client, before any request is made.
///
/// Request-time failures are reported through the engine's `ClientError`
/// so the coordinator can treat every backend uniformly.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// A required environment variable is unset.
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),

    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}
