//! Caller-facing result type and the untrusted provider payload.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Surface rust that can be cleaned off; no material loss.
pub const CLASSIFICATION_CLEANABLE: &str = "cleanable_surface_rust";
/// Pitting, holes, or flaking; the part should be replaced.
pub const CLASSIFICATION_REPLACE: &str = "deep_corrosion_replace";
/// The model could not judge part integrity from the photo.
pub const CLASSIFICATION_UNCERTAIN: &str = "uncertain";

/// Raw classification payload from the provider.
///
/// This is untrusted external JSON: documented keys are `classification`,
/// `confidence`, and `rationale`, plus adapter-stamped `latency_ms` and
/// `model_version` — but any key may be absent or wrong-typed. Coercion and
/// defaulting happen in the decision builder, never here.
pub type RawProviderResponse = serde_json::Map<String, serde_json::Value>;

/// Validated inspection verdict returned to the caller.
///
/// Immutable once built; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InspectionResult {
    /// One of `cleanable_surface_rust`, `deep_corrosion_replace`,
    /// `uncertain`.
    #[schema(example = "cleanable_surface_rust")]
    pub classification: String,
    /// Model-reported confidence, nominally in [0, 1].
    #[schema(example = 0.83)]
    pub confidence: f64,
    /// Short explanation of why the decision was made.
    pub rationale: String,
    /// True when confidence is below threshold or the model was uncertain.
    pub needs_review: bool,
    /// Underlying VLM model identifier.
    pub model_version: String,
    /// End-to-end model call latency in milliseconds.
    pub latency_ms: u64,
}
