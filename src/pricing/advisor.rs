use std::sync::Arc;

use tracing::warn;

use crate::generation::{GenerationConfig, TextGenerator};
use crate::pricing::error::PriceError;
use crate::pricing::extractor::extract_price_range;
use crate::pricing::query::{PriceQuery, PriceRange};
use crate::pricing::selector::{select_model, MODEL_CANDIDATES};

/// Runs model selection followed by price extraction.
///
/// Holds only read-only values, so one advisor is shared by all requests.
/// Every call to [`PriceAdvisor::suggest`] selects a model from scratch.
#[derive(Clone)]
pub struct PriceAdvisor {
    generator: Arc<dyn TextGenerator>,
    candidates: Vec<String>,
    generation_config: GenerationConfig,
}

impl PriceAdvisor {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            candidates: MODEL_CANDIDATES.iter().map(|s| s.to_string()).collect(),
            generation_config: GenerationConfig::DETERMINISTIC,
        }
    }

    pub fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_configured()
    }

    #[tracing::instrument(
        level = "info",
        skip(self, query),
        fields(crop = %query.crop, location = %query.location)
    )]
    pub async fn suggest(&self, query: &PriceQuery) -> Result<PriceRange, PriceError> {
        let model = select_model(self.generator.as_ref(), &self.candidates).await?;
        let result = extract_price_range(&model, query, &self.generation_config).await;
        if let Err(err) = &result {
            warn!(kind = err.kind(), "Price suggestion failed: {}", err);
        }
        result
    }
}
