//! HTTP error mapping for the query API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use tamarack::catalogs::CatalogError;

/// Error payload returned to clients
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
    pub code: &'static str,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Catalog(CatalogError),
}

impl ApiError {
    pub fn bad_request(err: impl std::fmt::Display) -> Self {
        ApiError::BadRequest(err.to_string())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Catalog(err) => StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::BadRequest(detail) => ErrorBody {
                detail: detail.clone(),
                code: "bad_request",
            },
            ApiError::NotFound(detail) => ErrorBody {
                detail: detail.clone(),
                code: "not_found",
            },
            ApiError::Catalog(err) => ErrorBody {
                detail: err.to_string(),
                code: err.code(),
            },
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
