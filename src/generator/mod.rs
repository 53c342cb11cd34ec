//! Content generator module
//!
//! Provides the [`Generator`] seam, the OpenAI implementation behind it,
//! and prompt construction for both response shapes.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod openai;
pub mod prompt;
mod types;

pub use client::Generator;
pub use error::GeneratorError;
pub use openai::OpenAiGenerator;
pub use types::{GenerationRequest, RawResponse, TokenUsage};

use crate::config::GeneratorConfig;

/// Create a generator based on the provider specified in config
pub fn create_generator(config: &GeneratorConfig) -> Result<Arc<dyn Generator>, GeneratorError> {
    debug!(provider = %config.provider, model = %config.model, "create_generator: called");
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiGenerator::from_config(config)?)),
        other => Err(GeneratorError::InvalidResponse(format!(
            "Unknown generator provider: '{}'. Supported: openai",
            other
        ))),
    }
}
