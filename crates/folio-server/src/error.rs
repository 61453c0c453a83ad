use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use folio_core::ProjectError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] ProjectError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// An error returned to an HTTP client as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ProjectError> for ApiError {
    fn from(err: ProjectError) -> Self {
        let status = match &err {
            ProjectError::InvalidName { .. } => StatusCode::BAD_REQUEST,
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            ProjectError::DuplicateName(_) | ProjectError::ConcurrentModification { .. } => {
                StatusCode::CONFLICT
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %err, "request failed");
        }
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ContentHash, VersionId};

    fn status_of(err: ProjectError) -> StatusCode {
        ApiError::from(err).status()
    }

    #[test]
    fn project_errors_map_to_statuses() {
        assert_eq!(
            status_of(ProjectError::InvalidName {
                name: "A B".into(),
                reason: "spaces".into()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ProjectError::ProjectNotFound("ghost".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ProjectError::PageNotFound {
                project: "docs".into(),
                version: VersionId::generate(),
                page: "nope".into(),
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ProjectError::DuplicateName("docs".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ProjectError::ConcurrentModification {
                project: "docs".into(),
                expected: VersionId::generate(),
                actual: VersionId::generate(),
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ProjectError::ContentMissing {
                project: "docs".into(),
                page: "index".into(),
                hash: ContentHash::from_digest([0; 32]),
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
