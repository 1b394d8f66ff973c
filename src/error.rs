use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Per-request failures. Display strings double as the `error` field of the
/// JSON body, so they are part of the wire contract.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid JSON format")]
    MalformedInsertBody,

    #[error("Invalid data format. Expected an array of people.")]
    InvalidPeople,

    #[error("Invalid JSON")]
    MalformedStatementBody,

    #[error("Only SELECT and INSERT queries are allowed")]
    DisallowedStatement,

    #[error("Failed to insert data")]
    Insert(#[source] anyhow::Error),

    #[error("Query execution failed")]
    Execute(#[source] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match self {
            GatewayError::MalformedInsertBody
            | GatewayError::InvalidPeople
            | GatewayError::MalformedStatementBody => StatusCode::BAD_REQUEST,
            GatewayError::DisallowedStatement => StatusCode::FORBIDDEN,
            GatewayError::Insert(_) | GatewayError::Execute(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Store errors surface their raw text in `details`, matching the
        // original gateway's behavior of exposing backend error messages.
        let details = match &self {
            GatewayError::Insert(source) | GatewayError::Execute(source) => {
                Some(format!("{source:#}"))
            }
            _ => None,
        };

        if status.is_server_error() {
            error!(error = %self, details = details.as_deref(), "request failed");
        }

        let body = ErrorBody {
            error: self.to_string(),
            details,
        };
        (status, Json(body)).into_response()
    }
}
