use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::QuestionSetError;
use crate::services::{CatalogError, DiagnosisError, QuizError};

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Question set error: {0}")]
    QuestionSet(#[from] QuestionSetError),

    #[error("Invalid answers: {0}")]
    Diagnosis(#[from] DiagnosisError),

    #[error("Invalid quiz transition: {0}")]
    Quiz(#[from] QuizError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Diagnosis(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Quiz(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::Catalog(_) | AppError::QuestionSet(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
