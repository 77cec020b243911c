//! Offline placeholder provider for demo mode and tests.
//!
//! Returns a fixed low-confidence payload instead of calling out. The model
//! version always carries a `-demo` suffix so a synthetic verdict can never
//! be mistaken for a real one downstream.

use async_trait::async_trait;
use serde_json::Value;

use super::VisionProvider;
use crate::error::ProviderError;
use crate::types::{RawProviderResponse, CLASSIFICATION_UNCERTAIN};

/// Placeholder provider used when demo mode is enabled, and as a
/// deterministic double in tests.
#[derive(Debug)]
pub struct DemoProvider {
    model: String,
    /// Canned payload override for tests; stamped fields still apply.
    payload: Option<RawProviderResponse>,
}

impl DemoProvider {
    pub fn new(model: String) -> Self {
        Self {
            model,
            payload: None,
        }
    }

    /// Return a specific payload from every classify call. Tests use this
    /// to drive the decision builder with known provider output.
    pub fn with_payload(model: String, payload: RawProviderResponse) -> Self {
        Self {
            model,
            payload: Some(payload),
        }
    }

    fn model_version(&self) -> String {
        format!("{}-demo", self.model)
    }
}

#[async_trait]
impl VisionProvider for DemoProvider {
    async fn classify(
        &self,
        _image: &[u8],
        _hint: Option<&str>,
    ) -> Result<RawProviderResponse, ProviderError> {
        let mut payload = match &self.payload {
            Some(canned) => canned.clone(),
            None => {
                let mut map = RawProviderResponse::new();
                map.insert(
                    "classification".to_string(),
                    Value::from(CLASSIFICATION_UNCERTAIN),
                );
                map.insert("confidence".to_string(), Value::from(0.2));
                map.insert(
                    "rationale".to_string(),
                    Value::from(
                        "Demo mode: no provider credential configured; placeholder verdict.",
                    ),
                );
                map
            }
        };

        payload.insert("latency_ms".to_string(), Value::from(0u64));
        if !payload.contains_key("model_version") {
            payload.insert("model_version".to_string(), Value::from(self.model_version()));
        }

        Ok(payload)
    }

    fn provider_name(&self) -> &'static str {
        "demo"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
