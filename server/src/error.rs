use std::collections::BTreeMap;
use std::process::{ExitCode, Termination};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use error_stack::Report;
use kernel::KernelError;
use serde::Serialize;
use serde_json::json;
use validator::ValidationErrors;

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub enum ErrorStatus {
    Kernel(Report<KernelError>),
    NotFound(String),
    /// Field name to the message of its first failed rule.
    Validation(BTreeMap<String, String>),
    TypeConversion { parameter: String, value: String },
    BadRequest(String),
    CreationFailed,
}

impl ErrorStatus {
    pub fn conversion(parameter: impl Into<String>, value: impl Into<String>) -> Self {
        Self::TypeConversion {
            parameter: parameter.into(),
            value: value.into(),
        }
    }
}

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus::Kernel(e)
    }
}

impl From<ValidationErrors> for ErrorStatus {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errors)| {
                let error = errors.first()?;
                let message = error
                    .message
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| format!("{field} is invalid"));
                Some((field.to_string(), message))
            })
            .collect();
        ErrorStatus::Validation(fields)
    }
}

#[derive(Debug, Serialize)]
struct ProblemDetail {
    title: &'static str,
    status: u16,
    detail: String,
}

impl ProblemDetail {
    fn bad_request(detail: String) -> Self {
        Self {
            title: "Bad Request",
            status: StatusCode::BAD_REQUEST.as_u16(),
            detail,
        }
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> Response {
        match self {
            ErrorStatus::Kernel(report) => {
                tracing::error!("{report:?}");
                match report.current_context() {
                    KernelError::Timeout => StatusCode::REQUEST_TIMEOUT,
                    KernelError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
                }
                .into_response()
            }
            ErrorStatus::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
            }
            ErrorStatus::Validation(fields) => {
                (StatusCode::BAD_REQUEST, Json(fields)).into_response()
            }
            ErrorStatus::TypeConversion { parameter, value } => {
                let detail = format!("Failed to convert '{parameter}' with value: '{value}'");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ProblemDetail::bad_request(detail)),
                )
                    .into_response()
            }
            ErrorStatus::BadRequest(detail) => (
                StatusCode::BAD_REQUEST,
                Json(ProblemDetail::bad_request(detail)),
            )
                .into_response(),
            ErrorStatus::CreationFailed => StatusCode::BAD_REQUEST.into_response(),
        }
    }
}
