use tracing::{error, info, warn};

use crate::generation::{GenerationConfig, GenerationError, TextGenerator};
use crate::pricing::error::PriceError;

/// Model identifiers tried in order, cheapest and fastest first.
pub const MODEL_CANDIDATES: &[&str] = &["gemini-1.5-flash", "gemini-1.5-pro", "gemini-pro"];

/// A model candidate that answered its probe, bound to the generator that
/// reached it. Lives only as long as the request that selected it.
pub struct WorkingModel<'a> {
    generator: &'a dyn TextGenerator,
    identifier: &'a str,
}

impl<'a> WorkingModel<'a> {
    pub fn identifier(&self) -> &str {
        self.identifier
    }

    pub async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, GenerationError> {
        self.generator
            .generate(self.identifier, prompt, Some(config))
            .await
    }
}

/// Probes `candidates` in order and returns the first that answers.
///
/// Issues at most `candidates.len()` probes; a failed probe moves on to the
/// next candidate and the whole list is never retried.
#[tracing::instrument(level = "info", skip_all)]
pub async fn select_model<'a>(
    generator: &'a dyn TextGenerator,
    candidates: &'a [String],
) -> Result<WorkingModel<'a>, PriceError> {
    for identifier in candidates {
        info!("Trying model: {}", identifier);
        match generator.probe(identifier).await {
            Ok(()) => {
                info!("Model {} is working", identifier);
                return Ok(WorkingModel {
                    generator,
                    identifier: identifier.as_str(),
                });
            }
            Err(err) => warn!("Model {} failed: {}", identifier, err),
        }
    }

    error!("All {} model candidates failed their probe", candidates.len());
    Err(PriceError::NoModelAvailable)
}
