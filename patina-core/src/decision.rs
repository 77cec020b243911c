//! Decision builder: raw provider payload to final verdict.
//!
//! Pure and total. The provider payload is untrusted JSON; every field is
//! coerced with a conservative default rather than rejected, because a
//! human reviewer downstream is the real safety net. A payload we cannot
//! read becomes `uncertain` with `needs_review` set.

use serde_json::Value;

use crate::config::Settings;
use crate::types::{InspectionResult, RawProviderResponse, CLASSIFICATION_UNCERTAIN};

/// Rationale used when the provider returned none.
pub const NO_RATIONALE: &str = "No rationale returned.";

/// Build the caller-facing result from the raw provider payload.
///
/// `needs_review` is true iff the classification is `uncertain` or the
/// confidence is below the configured threshold. Out-of-range confidence
/// values are passed through, not clamped.
pub fn build_result(raw: &RawProviderResponse, settings: &Settings) -> InspectionResult {
    let classification = raw
        .get("classification")
        .and_then(Value::as_str)
        .unwrap_or(CLASSIFICATION_UNCERTAIN)
        .to_string();
    let confidence = raw.get("confidence").and_then(Value::as_f64).unwrap_or(0.0);
    let rationale = raw
        .get("rationale")
        .and_then(Value::as_str)
        .unwrap_or(NO_RATIONALE)
        .to_string();
    let latency_ms = raw.get("latency_ms").and_then(Value::as_u64).unwrap_or(0);
    let model_version = raw
        .get("model_version")
        .and_then(Value::as_str)
        .unwrap_or(&settings.openai_model)
        .to_string();

    let needs_review =
        classification == CLASSIFICATION_UNCERTAIN || confidence < settings.confidence_threshold;

    InspectionResult {
        classification,
        confidence,
        rationale,
        needs_review,
        model_version,
        latency_ms,
    }
}
