use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Failed to extract PDF text: {0}")]
    Extraction(String),

    #[error("Error generating questions: {0}")]
    Upstream(String),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Could not parse model response: {0}")]
    Parse(String),

    #[error("Response does not match the question schema: {0}")]
    Schema(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) | Error::Validation(_) | Error::Multipart(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let detail = if status.is_client_error() {
            tracing::warn!(error = %self, "Rejected request");
            self.to_string()
        } else {
            tracing::error!(error = ?self, "Request failed");
            format!("Error processing request: {}", self)
        };

        let body = Json(json!({ "detail": detail }));
        (status, body).into_response()
    }
}
