use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use crate::api::request::{FieldSource, SuggestionRequest};
use crate::api::response::{
    timestamp, AiFallbackData, AiSuggestionData, MarketPriceData, SuggestionResponse,
};
use crate::api::AppState;
use crate::bail_api;
use crate::error::{ApiError, ApiResult};
use crate::pricing::PriceQuery;

const SERVICE_NAME: &str = "Gemini AI Price Suggestion API";

type MarketPriceResponse = SuggestionResponse<MarketPriceData>;
type AiPriceResponse = SuggestionResponse<AiSuggestionData, AiFallbackData>;

#[axum_macros::debug_handler]
pub(crate) async fn handle_health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": SERVICE_NAME,
            "timestamp": timestamp(),
            "config": {
                "environment": state.environment,
                "debug": state.debug,
                "gemini_configured": state.advisor.is_configured(),
            },
        })),
    )
}

#[axum_macros::debug_handler]
pub(crate) async fn handle_test(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Gemini AI Price API is working!",
            "timestamp": timestamp(),
            "config": {
                "environment": state.environment,
                "debug": state.debug,
            },
        })),
    )
}

#[axum_macros::debug_handler]
pub(crate) async fn handle_test_gemini(
    State(state): State<AppState>,
) -> (StatusCode, Json<Value>) {
    info!("Testing Gemini AI connection...");
    let query = PriceQuery::new("Tomato", "Bangalore, Karnataka");

    let body = match state.advisor.suggest(&query).await {
        Ok(range) => json!({
            "success": true,
            "message": "Gemini AI is working!",
            "test_result": {
                "crop": query.crop,
                "location": query.location,
                "min_price": range.min_price(),
                "max_price": range.max_price(),
            },
            "timestamp": timestamp(),
        }),
        Err(_) => json!({
            "success": false,
            "message": "Gemini AI test failed - could not get price data",
            "timestamp": timestamp(),
        }),
    };
    (StatusCode::OK, Json(body))
}

#[axum_macros::debug_handler]
pub(crate) async fn handle_price_suggestion_query(
    State(state): State<AppState>,
    params: Result<Query<SuggestionRequest>, QueryRejection>,
) -> ApiResult<(StatusCode, Json<MarketPriceResponse>)> {
    let query = query_params(params)?.into_query(FieldSource::Query)?;
    Ok((StatusCode::OK, Json(market_price(&state, query).await)))
}

#[axum_macros::debug_handler]
pub(crate) async fn handle_price_suggestion_body(
    State(state): State<AppState>,
    payload: Result<Json<SuggestionRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MarketPriceResponse>)> {
    let query = json_body(payload)?.into_query(FieldSource::Body)?;
    Ok((StatusCode::OK, Json(market_price(&state, query).await)))
}

#[axum_macros::debug_handler]
pub(crate) async fn handle_ai_price_suggestion(
    State(state): State<AppState>,
    payload: Result<Json<SuggestionRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AiPriceResponse>)> {
    let query = json_body(payload)?.into_query(FieldSource::Body)?;
    info!("Getting AI price suggestion for {}", query);

    let response = match state.advisor.suggest(&query).await {
        Ok(range) => {
            let data = AiSuggestionData::new(query, range);
            info!(
                suggested_price = data.suggested_price,
                "Generated AI price suggestion: {}", data.display_text
            );
            AiPriceResponse::success(data)
        }
        Err(_) => AiPriceResponse::failure(
            format!("Unable to get AI price data for {query}. Please try again."),
            Some(query.into()),
        ),
    };
    Ok((StatusCode::OK, Json(response)))
}

pub(crate) async fn handle_not_found() -> ApiError {
    ApiError::not_found()
}

async fn market_price(state: &AppState, query: PriceQuery) -> MarketPriceResponse {
    info!("Getting price suggestion for {}", query);
    match state.advisor.suggest(&query).await {
        Ok(range) => {
            let data = MarketPriceData::new(query, range);
            info!(modal_price = data.modal_price, "Generated price suggestion");
            MarketPriceResponse::success(data)
        }
        Err(_) => MarketPriceResponse::failure(
            format!("Unable to get price data for {query}. Please try again."),
            None,
        ),
    }
}

fn query_params(
    params: Result<Query<SuggestionRequest>, QueryRejection>,
) -> ApiResult<SuggestionRequest> {
    match params {
        Ok(Query(req)) => Ok(req),
        Err(rejection) => {
            info!("Rejected query string: {}", rejection.body_text());
            bail_api!(
                StatusCode::BAD_REQUEST,
                "Invalid request",
                "Malformed query string"
            )
        }
    }
}

fn json_body(
    payload: Result<Json<SuggestionRequest>, JsonRejection>,
) -> ApiResult<SuggestionRequest> {
    match payload {
        Ok(Json(req)) => Ok(req),
        Err(rejection) => {
            info!("Rejected request body: {}", rejection.body_text());
            bail_api!(
                StatusCode::BAD_REQUEST,
                "Invalid request",
                "JSON body is required"
            )
        }
    }
}
