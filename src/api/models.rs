use crate::api::auth::AuthGuard;
use crate::storage::{JsonFileStorage, StorageError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<JsonFileStorage>,
    pub auth: Arc<AuthGuard>,
}

impl AppState {
    pub fn new(storage: JsonFileStorage, auth: AuthGuard) -> Self {
        Self {
            storage: Arc::new(storage),
            auth: Arc::new(auth),
        }
    }
}

/// Response after deleting a review
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized: invalid or missing API key")]
    Unauthorized,
    #[error("Missing required header: x-user-id")]
    MissingUserId,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Review not found")]
    NotFound,
    #[error("Duplicate review: you already reviewed this movie")]
    Conflict,
    #[error("Review storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::MissingUserId | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let AppError::Storage(e) = &self {
            error!("Storage error: {}", e);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}
