use tracing::{debug, error, info};

use crate::generation::GenerationConfig;
use crate::pricing::error::PriceError;
use crate::pricing::parsing::parse_price_range;
use crate::pricing::prompt::build_price_prompt;
use crate::pricing::query::{PriceQuery, PriceRange};
use crate::pricing::selector::WorkingModel;

/// Prompts `model` once for `query` and parses a price range out of whatever
/// text comes back.
#[tracing::instrument(level = "info", skip_all, fields(model = model.identifier()))]
pub async fn extract_price_range(
    model: &WorkingModel<'_>,
    query: &PriceQuery,
    config: &GenerationConfig,
) -> Result<PriceRange, PriceError> {
    let prompt = build_price_prompt(query);
    debug!("Generated prompt: {}", prompt);

    let text = model
        .generate(&prompt, config)
        .await
        .map_err(|source| PriceError::Generation {
            model: model.identifier().to_string(),
            source,
        })?;
    let text = text.trim();
    info!("Model response: {}", text);

    match parse_price_range(text) {
        Some((range, strategy)) => {
            info!(
                %strategy,
                min_price = range.min_price(),
                max_price = range.max_price(),
                "Extracted price range"
            );
            Ok(range)
        }
        None => {
            error!("All parsing strategies failed");
            Err(PriceError::ExtractionFailed)
        }
    }
}
