use axum::http::StatusCode;
use serde::Deserialize;

use crate::bail_api;
use crate::error::ApiResult;
use crate::pricing::PriceQuery;

/// Raw crop/location pair as sent by a client, before validation.
#[derive(Deserialize, Debug, Default)]
pub struct SuggestionRequest {
    pub crop: Option<String>,
    pub location: Option<String>,
}

/// Where the request fields came from; only changes the wording of errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldSource {
    Query,
    Body,
}

impl FieldSource {
    fn missing_error(self) -> &'static str {
        match self {
            FieldSource::Query => "Missing required parameter",
            FieldSource::Body => "Missing required field",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            FieldSource::Query => "parameter",
            FieldSource::Body => "field",
        }
    }
}

impl SuggestionRequest {
    /// Requires non-blank `crop` and `location`, checked in that order. The
    /// values are passed on exactly as received.
    pub fn into_query(self, source: FieldSource) -> ApiResult<PriceQuery> {
        let crop = required(self.crop, "crop", source)?;
        let location = required(self.location, "location", source)?;
        Ok(PriceQuery { crop, location })
    }
}

fn required(value: Option<String>, name: &str, source: FieldSource) -> ApiResult<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => bail_api!(
            StatusCode::BAD_REQUEST,
            source.missing_error(),
            "{} {} is required",
            name,
            source.noun()
        ),
    }
}
