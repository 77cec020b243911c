//! Inspection orchestrator.
//!
//! Pure sequencing: normalize the photo, ask the provider, build the
//! verdict. No state is retained across calls, so concurrent requests are
//! independent; the provider call is the single suspension point.

use crate::config::Settings;
use crate::decision::build_result;
use crate::error::InspectError;
use crate::provider::VisionProvider;
use crate::types::InspectionResult;

/// Run one inspection end to end.
///
/// Fails with whatever the normalizer or provider fail with; no additional
/// error kinds are introduced here.
pub async fn inspect(
    image_bytes: &[u8],
    part_type: Option<&str>,
    settings: &Settings,
    provider: &dyn VisionProvider,
) -> Result<InspectionResult, InspectError> {
    let normalized = crate::image::normalize(image_bytes, settings.max_image_size_px)?;
    let raw = provider.classify(&normalized, part_type).await?;
    Ok(build_result(&raw, settings))
}
