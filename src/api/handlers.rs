use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::{Answers, Bean, QuestionSet};
use crate::services::{
    DiagnosisEngine, DiagnosisResults, QuestionView, QuizEvent, QuizSession, QuizState,
};

use super::AppState;

/// Message shown when no bean passes even the relaxed freshness window
pub const NO_STOCK_MESSAGE: &str =
    "現在おすすめできる豆がありません。時期をあらためてお試しください。";

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct DiagnosisRequest {
    #[serde(default)]
    pub answers: Answers,
    /// Reference instant for freshness checks; the server clock when omitted
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

/// Either a full set of recommendations or the empty state
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DiagnosisOutcome {
    Matched { results: DiagnosisResults },
    NoStock { message: String },
}

impl From<Option<DiagnosisResults>> for DiagnosisOutcome {
    fn from(results: Option<DiagnosisResults>) -> Self {
        match results {
            Some(results) => DiagnosisOutcome::Matched { results },
            None => DiagnosisOutcome::NoStock {
                message: NO_STOCK_MESSAGE.to_string(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct QuizRequest {
    #[serde(default)]
    pub session: QuizSession,
    pub event: QuizEvent,
}

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub session: QuizSession,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<DiagnosisOutcome>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Get the quiz questions
pub async fn get_questions(State(state): State<AppState>) -> Json<QuestionSet> {
    Json(state.questions.as_ref().clone())
}

/// Get the bean catalog
pub async fn get_beans(State(state): State<AppState>) -> Json<Vec<Bean>> {
    Json(state.catalog.beans().to_vec())
}

/// Compute per-slot recommendations from a complete answer set
pub async fn diagnose(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<DiagnosisRequest>, JsonRejection>,
) -> AppResult<Json<DiagnosisOutcome>> {
    let Json(request) = payload.map_err(invalid_body)?;
    let now = request.now.unwrap_or_else(|| state.clock.now());
    tracing::info!(
        request_id = %request_id,
        answers = ?request.answers,
        now = %now,
        "Processing diagnosis request"
    );

    let outcome = run_diagnosis(&state, &request.answers, now)?;

    tracing::info!(
        request_id = %request_id,
        matched = matches!(outcome, DiagnosisOutcome::Matched { .. }),
        "Diagnosis completed"
    );

    Ok(Json(outcome))
}

/// Advance a client-held quiz session by one event
pub async fn quiz_step(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<QuizRequest>, JsonRejection>,
) -> AppResult<Json<QuizResponse>> {
    let Json(request) = payload.map_err(invalid_body)?;
    tracing::debug!(
        request_id = %request_id,
        state = ?request.session.state,
        event = ?request.event,
        "Applying quiz event"
    );

    let session = request.session.apply(request.event, &state.questions)?;
    let question = QuestionView::for_session(&session, &state.questions);

    let outcome = match session.state {
        QuizState::ShowingResult => Some(run_diagnosis(
            &state,
            &session.answers,
            state.clock.now(),
        )?),
        _ => None,
    };

    Ok(Json(QuizResponse {
        session,
        question,
        outcome,
    }))
}

fn invalid_body(rejection: JsonRejection) -> AppError {
    AppError::InvalidInput(rejection.body_text())
}

fn run_diagnosis(
    state: &AppState,
    answers: &Answers,
    now: DateTime<Utc>,
) -> AppResult<DiagnosisOutcome> {
    let engine = DiagnosisEngine::new(&state.questions, &state.settings);
    let results = engine.compute_results(answers, state.catalog.beans(), now)?;
    Ok(results.into())
}
