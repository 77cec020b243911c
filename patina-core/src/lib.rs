pub mod config;
pub mod decision;
pub mod error;
pub mod image;
pub mod inspect;
pub mod provider;
pub mod types;

pub use config::Settings;
pub use crate::image::normalize;
pub use decision::build_result;
pub use error::{ImageError, InspectError, ProviderError};
pub use inspect::inspect;
pub use provider::{provider_from_settings, DemoProvider, OpenAiProvider, VisionProvider};
pub use types::{
    InspectionResult, RawProviderResponse, CLASSIFICATION_CLEANABLE, CLASSIFICATION_REPLACE,
    CLASSIFICATION_UNCERTAIN,
};
