//! Unified application error model and mapping helpers.
//! `DirectoryError` is what the directory core returns; `AppError` is what the HTTP
//! frontend renders. The conversion between the two decides which details reach callers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use tracing::error;

use crate::server::envelope::ApiResponse;

/// Message returned to callers for every internal failure.
pub const GENERIC_INTERNAL_MESSAGE: &str = "internal server error";

/// Errors raised by the securities directory and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("security with ID {id} not found")]
    NotFound { id: String },
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl DirectoryError {
    pub fn not_found(id: impl Into<String>) -> Self {
        DirectoryError::NotFound { id: id.into() }
    }
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    UserInput { code: String, message: String },
    NotFound { code: String, message: String },
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::UserInput { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::UserInput { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn user<S: Into<String>>(code: S, msg: S) -> Self { AppError::UserInput { code: code.into(), message: msg.into() } }
    pub fn not_found<S: Into<String>>(code: S, msg: S) -> Self { AppError::NotFound { code: code.into(), message: msg.into() } }
    pub fn internal<S: Into<String>>(code: S, msg: S) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }

    /// Map to HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            AppError::UserInput { .. } => 400,
            AppError::NotFound { .. } => 404,
            AppError::Internal { .. } => 500,
        }
    }

    /// The message safe to hand to an HTTP client. Internal details never leave the process.
    pub fn public_message(&self) -> &str {
        match self {
            AppError::Internal { .. } => GENERIC_INTERNAL_MESSAGE,
            _ => self.message(),
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound { .. } => AppError::not_found("not_found".to_string(), err.to_string()),
            DirectoryError::Validation(_) => AppError::user("validation_error".to_string(), err.to_string()),
            DirectoryError::Internal(inner) => AppError::internal("internal_error".to_string(), format!("{inner:#}")),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal { code, message } = &self {
            error!(target: "bourse::http", code = %code, "request failed: {}", message);
        }
        let status = StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ApiResponse::<()>::failure(self.public_message());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
