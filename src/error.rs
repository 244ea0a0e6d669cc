use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::hours::HoursError;
use crate::store::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Attendance not found")]
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("request timed out")]
    Timeout,

    #[error("database error: {0}")]
    Store(#[source] sqlx::Error),
}

impl ApiError {
    /// Message shown to the caller. Store details stay in the server log.
    fn public_message(&self) -> String {
        match self {
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) | ApiError::Conflict(msg) => {
                msg.clone()
            }
            ApiError::Timeout => "Request timed out".to_string(),
            ApiError::Store(_) => "Internal server error".to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.public_message(),
        })
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => {
                ApiError::Conflict("Employee already has an open session on this date".to_string())
            }
            StoreError::Missing(_) => ApiError::NotFound("Attendance not found".to_string()),
            StoreError::Database(e) => ApiError::Store(e),
        }
    }
}

impl From<HoursError> for ApiError {
    fn from(e: HoursError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}
