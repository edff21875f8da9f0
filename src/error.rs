use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Client-facing copy stays in the storefront's Arabic, matching the frontend.
const MSG_METHOD_NOT_ALLOWED: &str = "يسمح فقط بطلبات POST";
const MSG_CONFIGURATION: &str = "خطأ في إعدادات السيرفر. يرجى التحقق من Environment Variables.";
const MSG_INTERNAL: &str = "حدث خطأ داخلي في السيرفر";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Invalid submission: {0}")]
    Validation(String),
    #[error("Unknown submission type: {0}")]
    UnknownType(String),
    #[error("Bot token or chat id not configured")]
    Configuration,
    #[error("Internal fault: {error}")]
    Internal {
        error: String,
        /// Fault chain, populated only when the dev flag is set.
        stack: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::MethodNotAllowed => {
                tracing::debug!("Rejected non-POST method");
                reject(StatusCode::METHOD_NOT_ALLOWED, MSG_METHOD_NOT_ALLOWED)
            }
            Self::Validation(msg) => {
                tracing::debug!(reason = %msg, "Submission failed validation");
                reject(StatusCode::BAD_REQUEST, &msg)
            }
            Self::UnknownType(msg) => {
                tracing::debug!(reason = %msg, "Unknown submission type");
                reject(StatusCode::BAD_REQUEST, &msg)
            }
            Self::Configuration => {
                tracing::error!("Bot token or chat id not configured");
                reject(StatusCode::INTERNAL_SERVER_ERROR, MSG_CONFIGURATION)
            }
            Self::Internal { error, stack } => {
                tracing::error!(error = %error, "Internal fault");
                let mut body = json!({
                    "success": false,
                    "message": MSG_INTERNAL,
                    "error": error,
                });
                // The key is omitted entirely outside dev mode, not set to null.
                if let Some(stack) = stack {
                    body["stack"] = json!(stack);
                }
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

fn reject(status: StatusCode, message: &str) -> Response {
    let body = Json(json!({
        "success": false,
        "message": message,
    }));
    (status, body).into_response()
}
