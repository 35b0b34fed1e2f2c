pub mod api;
pub mod config;
pub mod error;
pub mod generation;
pub mod pricing;
pub mod telemetry;

pub use error::{ApiError, ApiResult, HttpErrorResponse};
