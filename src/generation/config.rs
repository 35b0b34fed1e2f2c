use serde::{Deserialize, Serialize};

/// Sampling parameters sent with every price generation request.
///
/// The values are fixed so that an identical prompt against the same model
/// yields identical text.
#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    pub const DETERMINISTIC: GenerationConfig = GenerationConfig {
        temperature: 0.0,
        top_p: 1.0,
        top_k: 1,
        max_output_tokens: 100,
    };
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::DETERMINISTIC
    }
}
