use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

// Taken from https://github.com/tokio-rs/axum/blob/main/examples/anyhow-error-response/src/main.rs
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: HttpErrorResponse,
}

/// `{ success: false, error, message }` body shared by every error response.
#[derive(Debug, Serialize)]
pub struct HttpErrorResponse {
    success: bool,
    pub error: String,
    pub message: String,
}

impl HttpErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        HttpErrorResponse {
            success: false,
            error: error.into(),
            message: message.into(),
        }
    }
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError {
            status,
            body: HttpErrorResponse::new(error, message),
        }
    }

    pub fn not_found() -> Self {
        ApiError::new(
            StatusCode::NOT_FOUND,
            "Endpoint not found",
            "The requested endpoint does not exist",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut res = Json(self.body).into_response();
        *res.status_mut() = self.status;
        res
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        tracing::error!("Unexpected error: {:#}", err);
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            err.to_string(),
        )
    }
}

pub type ApiResult<T, E = ApiError> = Result<T, E>;

#[macro_export]
macro_rules! bail_api {
    ($status:expr, $error:expr, $message:expr) => {
        return Err($crate::error::ApiError::new($status, $error, $message))
    };
    ($status:expr, $error:expr, $fmt:expr $(, $arg:expr)+) => {
        return Err($crate::error::ApiError::new($status, $error, format!($fmt $(, $arg)+)))
    };
}
