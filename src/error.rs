use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum ToolroomError {
    #[error("{0}")]
    Validation(String),

    #[error("Tool ID '{0}' already exists")]
    DuplicateTool(String),

    #[error("No tool with ID '{0}'")]
    ToolNotFound(String),

    #[error("Tool '{0}' is out of stock")]
    OutOfStock(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Template error: {0}")]
    TemplateError(#[from] minijinja::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ToolroomError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Errors caused by the submitted input rather than the service itself.
    /// These are rendered inline on the originating form.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::DuplicateTool(_)
                | Self::ToolNotFound(_)
                | Self::OutOfStock(_)
                | Self::InvalidCredentials
        )
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::DuplicateTool(_) | Self::OutOfStock(_) => StatusCode::CONFLICT,
            Self::ToolNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::DatabaseError(_)
            | Self::TemplateError(_)
            | Self::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ToolroomError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = if self.is_user_facing() {
            ApiErrorBody {
                code: status
                    .canonical_reason()
                    .unwrap_or("BAD_REQUEST")
                    .to_uppercase()
                    .replace(' ', "_"),
                message: self.to_string(),
            }
        } else {
            error!(error = %self, "request failed");
            ApiErrorBody {
                code: "INTERNAL_ERROR".to_string(),
                message: "An internal server error occurred.".to_string(),
            }
        };
        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
