use crate::dtos::MessageResponse;
use crate::services::StoreError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Failures of the product endpoints, rendered as `{ "message": ... }`.
#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    InvalidBody(String),
}

impl From<JsonRejection> for ProductError {
    fn from(rejection: JsonRejection) -> Self {
        ProductError::InvalidBody(rejection.body_text())
    }
}

impl ProductError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProductError::NotFound => StatusCode::NOT_FOUND,
            ProductError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProductError::InvalidBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        if let ProductError::Store(err) = &self {
            tracing::error!(error = %err, "Product store call failed");
        }

        (self.status(), Json(MessageResponse::new(self.to_string()))).into_response()
    }
}
