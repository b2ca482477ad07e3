use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::report::LoadError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Report(#[from] LoadError),

    #[error("no player matches {0}")]
    PlayerNotFound(String),

    #[error("report path is outside the report directory: {0}")]
    PathNotAllowed(String),

    #[error("report loading task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Report(LoadError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Report(LoadError::Malformed { .. } | LoadError::NotAnObject(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Report(LoadError::Io { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::PlayerNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PathNotAllowed(_) => StatusCode::FORBIDDEN,
            ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn load_errors_map_to_statuses() {
        let missing = ApiError::from(LoadError::NotFound(PathBuf::from("r.json")));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let malformed = ApiError::from(LoadError::Malformed { path: PathBuf::from("r.json"), source });
        assert_eq!(malformed.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let not_object = ApiError::from(LoadError::NotAnObject(PathBuf::from("r.json")));
        assert_eq!(not_object.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn escaping_path_is_forbidden() {
        let err = ApiError::PathNotAllowed("../../etc/passwd".to_string());
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert!(err.to_string().contains("../../etc/passwd"));
    }

    #[test]
    fn message_names_the_path() {
        let err = ApiError::from(LoadError::NotFound(PathBuf::from("report_outputs/report.json")));
        assert_eq!(err.to_string(), "report file not found: report_outputs/report.json");
    }
}
