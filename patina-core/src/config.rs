//! Environment-sourced settings.
//!
//! Read once at process startup and passed by reference into every
//! component; nothing in the core reaches for the environment afterwards.

use std::env;

/// Default confidence below which a verdict is flagged for review.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.72;

/// Default bound on the longest image side sent to the provider.
pub const DEFAULT_MAX_IMAGE_SIZE_PX: u32 = 1024;

/// Default model identifier when OPENAI_MODEL is not set.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Process-wide configuration, immutable after startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// API credential for the vision provider. When absent, requests fail
    /// with a provider-not-configured error unless demo mode is enabled.
    pub openai_api_key: Option<String>,
    /// Model identifier sent in provider requests and used as the
    /// `model_version` fallback in results.
    pub openai_model: String,
    /// Verdicts with confidence below this are flagged `needs_review`.
    pub confidence_threshold: f64,
    /// Longest-side pixel bound applied by the image normalizer.
    pub max_image_size_px: u32,
    /// When set and no credential is configured, a placeholder provider is
    /// used instead of calling out. For local development only.
    pub demo_mode: bool,
    /// Optional bearer token for the HTTP layer. When unset, all requests
    /// are allowed (useful for local dev).
    pub api_token: Option<String>,
}

impl Settings {
    /// Build settings from the environment. Unparseable numeric values fall
    /// back to their defaults rather than aborting startup.
    pub fn from_env() -> Self {
        Self {
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|s| !s.is_empty()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            confidence_threshold: env::var("CONFIDENCE_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD),
            max_image_size_px: env::var("MAX_IMAGE_SIZE_PX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_IMAGE_SIZE_PX),
            demo_mode: env::var("DEMO_MODE")
                .map(|v| flag_enabled(&v))
                .unwrap_or(false),
            api_token: env::var("API_TOKEN").ok().filter(|s| !s.is_empty()),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: DEFAULT_MODEL.to_string(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            max_image_size_px: DEFAULT_MAX_IMAGE_SIZE_PX,
            demo_mode: false,
            api_token: None,
        }
    }
}

fn flag_enabled(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}
