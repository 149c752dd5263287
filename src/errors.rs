use thiserror::Error;
use worker::Error as WorkerError;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing parameters")]
    MissingParameters,
    #[error("{0}")]
    NotFound(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),
    #[error("HTTP error: {0}")]
    Http(#[from] http::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// HTTP status code this error is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingParameters => 400,
            Self::NotFound(_) => 404,
            Self::MethodNotAllowed => 405,
            Self::Internal(_) | Self::Worker(_) | Self::Http(_) | Self::Json(_) => 500,
        }
    }

    /// Client errors are rendered by the handler that raised them; everything
    /// else bubbles up to the router's catch-all.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<AppError> for WorkerError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Worker(e) => e,
            other => WorkerError::RustError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(AppError::MissingParameters.status_code(), 400);
        assert_eq!(AppError::not_found("File not found").status_code(), 404);
        assert_eq!(AppError::MethodNotAllowed.status_code(), 405);
        assert_eq!(AppError::Internal("boom".into()).status_code(), 500);
    }

    #[test]
    fn only_internal_errors_escape_handlers() {
        assert!(AppError::MissingParameters.is_client_error());
        assert!(AppError::not_found("Endpoint not found").is_client_error());
        assert!(!AppError::Internal("boom".into()).is_client_error());
    }

    #[test]
    fn not_found_displays_its_message_verbatim() {
        assert_eq!(AppError::not_found("File not found").to_string(), "File not found");
    }
}
