use crate::api::AppState;
use crate::api::schemas::submissions::{SubmissionRequest, SubmissionResponse};
use crate::domain::submission::Submission;
use crate::error::{AppError, Result};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// Relays one storefront submission to the Telegram bot.
///
/// # Errors
/// Returns `AppError::Validation`/`AppError::UnknownType` for bad payloads,
/// `AppError::Configuration` when credentials are missing, and
/// `AppError::Internal` for transport faults. A provider rejection is not an
/// error: it answers 200 with the fallback body.
pub async fn relay_submission(
    State(state): State<AppState>,
    Json(payload): Json<SubmissionRequest>,
) -> Result<impl IntoResponse> {
    let submission = Submission::try_from(payload)?;

    tracing::info!(
        kind = submission.kind.as_str(),
        customer = %submission.customer.name,
        "Submission received"
    );

    let outcome = state.relay_service.handle(&submission).await?;
    Ok(SubmissionResponse::from(outcome))
}

/// Bare preflight answer; the CORS layer decorates it with the headers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Explicit 405 body for methods outside POST/OPTIONS.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
