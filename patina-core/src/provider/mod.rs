//! Vision provider abstraction.
//!
//! One trait, interchangeable implementations: the real OpenAI adapter and
//! an offline placeholder for demo mode and tests. The implementation is
//! selected once at startup from configuration, never per call site.

mod demo;
mod openai;

pub use demo::DemoProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;
use std::fmt;

use crate::config::Settings;
use crate::error::ProviderError;
use crate::types::RawProviderResponse;

/// A hosted vision-language model that classifies a part photo.
///
/// Implementations are stateless and thread-safe. `classify` makes at most
/// one outbound call and never retries; failures surface immediately.
#[async_trait]
pub trait VisionProvider: Send + Sync + fmt::Debug {
    /// Classify a normalized JPEG image, with an optional free-text
    /// part-type hint appended to the prompt.
    ///
    /// The returned payload is untrusted provider JSON with `latency_ms`
    /// and `model_version` stamped in by the adapter.
    async fn classify(
        &self,
        image: &[u8],
        hint: Option<&str>,
    ) -> Result<RawProviderResponse, ProviderError>;

    /// Provider name (e.g., "openai", "demo").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gpt-4o").
    fn model_name(&self) -> &str;
}

/// Select a provider from configuration.
///
/// A configured credential always wins. Without one, demo mode substitutes
/// the offline placeholder; otherwise the real adapter is returned
/// unconfigured and every classify call fails with
/// [`ProviderError::NotConfigured`], surfaced per request rather than at
/// startup.
pub fn provider_from_settings(settings: &Settings) -> Box<dyn VisionProvider> {
    match &settings.openai_api_key {
        Some(key) => Box::new(OpenAiProvider::new(
            Some(key.clone()),
            settings.openai_model.clone(),
        )),
        None if settings.demo_mode => Box::new(DemoProvider::new(settings.openai_model.clone())),
        None => Box::new(OpenAiProvider::new(None, settings.openai_model.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_prefers_real_provider() {
        let settings = Settings {
            openai_api_key: Some("sk-test".to_string()),
            demo_mode: true,
            ..Settings::default()
        };
        let provider = provider_from_settings(&settings);
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_factory_demo_without_credential() {
        let settings = Settings {
            demo_mode: true,
            ..Settings::default()
        };
        let provider = provider_from_settings(&settings);
        assert_eq!(provider.provider_name(), "demo");
    }

    #[tokio::test]
    async fn test_factory_unconfigured_fails_per_call() {
        let provider = provider_from_settings(&Settings::default());
        assert_eq!(provider.provider_name(), "openai");

        let result = provider.classify(&[0xFF, 0xD8], None).await;
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }
}
