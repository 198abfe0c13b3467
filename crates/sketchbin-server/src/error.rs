use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("store error: {0}")]
    Store(#[from] sketchbin_store::StoreError),

    #[error("{0}")]
    DocDb(#[from] sketchbin_docdb::DocDbError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::DocDb(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::DocDb(_) | Self::Store(_) | Self::Config(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchbin_docdb::DocDbError;
    use sketchbin_store::StoreError;

    #[test]
    fn status_mapping() {
        assert_eq!(ServerError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ServerError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::from(DocDbError::NoWrites).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::from(DocDbError::Poisoned("p".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        assert_eq!(
            ServerError::from(StoreError::from(io)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn docdb_messages_pass_through() {
        assert_eq!(ServerError::from(DocDbError::MissingName).to_string(), "missing name");
    }
}
