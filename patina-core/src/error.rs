use thiserror::Error;

/// Errors from image normalization.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Errors from the vision provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Provider returned error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse provider response: {detail}")]
    Parse {
        detail: String,
        /// Raw response envelope, kept for diagnostics.
        raw: String,
    },
}

/// Errors from a single inspection. The orchestrator introduces no error
/// kinds of its own; it only propagates what the normalizer or provider fail
/// with.
#[derive(Error, Debug)]
pub enum InspectError {
    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}
