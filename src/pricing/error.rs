use crate::generation::GenerationError;

/// Ways the price pipeline can fail for a single request. None of them are
/// retried inside the request.
#[derive(Debug, thiserror::Error)]
pub enum PriceError {
    #[error("no model candidate responded to the probe")]
    NoModelAvailable,

    #[error("generation with model {model} failed: {source}")]
    Generation {
        model: String,
        #[source]
        source: GenerationError,
    },

    #[error("no extraction strategy produced a valid price range")]
    ExtractionFailed,
}

impl PriceError {
    /// Short machine-friendly name, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            PriceError::NoModelAvailable => "no_model_available",
            PriceError::Generation { .. } => "generation_error",
            PriceError::ExtractionFailed => "extraction_failed",
        }
    }
}
