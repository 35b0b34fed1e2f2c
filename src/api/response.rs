use serde::Serialize;

use crate::pricing::{format_price, PriceQuery, PriceRange};

pub const CURRENCY: &str = "₹";
pub const UNIT: &str = "per kg";
pub const SOURCE: &str = "Gemini AI Market Analysis";
pub const FALLBACK_PLACEHOLDER: &str = "Enter price per kg";
pub const GENERATION_FAILED: &str = "Failed to generate price suggestion";

pub fn timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}

/// Either envelope of a suggestion endpoint. Pipeline failures are still
/// HTTP 200 so clients can render a fallback state.
#[derive(Serialize, Debug)]
#[serde(untagged)]
pub enum SuggestionResponse<T, F = ()> {
    Success {
        success: bool,
        data: T,
        timestamp: String,
    },
    Failure {
        success: bool,
        error: &'static str,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<F>,
        timestamp: String,
    },
}

impl<T, F> SuggestionResponse<T, F> {
    pub fn success(data: T) -> Self {
        SuggestionResponse::Success {
            success: true,
            data,
            timestamp: timestamp(),
        }
    }

    pub fn failure(message: String, data: Option<F>) -> Self {
        SuggestionResponse::Failure {
            success: false,
            error: GENERATION_FAILED,
            message,
            data,
            timestamp: timestamp(),
        }
    }
}

/// Data returned by `/api/price-suggestion`.
#[derive(Serialize, Debug)]
pub struct MarketPriceData {
    pub crop: String,
    pub location: String,
    pub min_price: f64,
    pub max_price: f64,
    pub modal_price: f64,
    pub currency: &'static str,
    pub unit: &'static str,
    pub source: &'static str,
}

impl MarketPriceData {
    pub fn new(query: PriceQuery, range: PriceRange) -> Self {
        Self {
            crop: query.crop,
            location: query.location,
            min_price: range.min_price(),
            max_price: range.max_price(),
            modal_price: range.suggested_price(),
            currency: CURRENCY,
            unit: UNIT,
            source: SOURCE,
        }
    }
}

/// Data returned by `/api/ai-price-suggestion`, ready to drop into a price
/// input field.
#[derive(Serialize, Debug)]
pub struct AiSuggestionData {
    pub crop: String,
    pub location: String,
    pub min_price: f64,
    pub max_price: f64,
    pub suggested_price: f64,
    pub currency: &'static str,
    pub unit: &'static str,
    pub display_text: String,
    pub placeholder_text: String,
}

impl AiSuggestionData {
    pub fn new(query: PriceQuery, range: PriceRange) -> Self {
        let suggested = range.suggested_price();
        let (min, max, mid) = (
            format_price(range.min_price()),
            format_price(range.max_price()),
            format_price(suggested),
        );
        Self {
            crop: query.crop,
            location: query.location,
            min_price: range.min_price(),
            max_price: range.max_price(),
            suggested_price: suggested,
            currency: CURRENCY,
            unit: UNIT,
            display_text: format!("AI Suggestion: ₹{mid}/kg (Range: ₹{min}-₹{max}/kg)"),
            placeholder_text: format!("₹{mid}/kg"),
        }
    }
}

/// Echo of the request sent with a failed `/api/ai-price-suggestion`.
#[derive(Serialize, Debug)]
pub struct AiFallbackData {
    pub crop: String,
    pub location: String,
    pub placeholder_text: &'static str,
}

impl From<PriceQuery> for AiFallbackData {
    fn from(query: PriceQuery) -> Self {
        Self {
            crop: query.crop,
            location: query.location,
            placeholder_text: FALLBACK_PLACEHOLDER,
        }
    }
}
