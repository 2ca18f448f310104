use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fanout_core::FanoutError;

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
///
/// Note that an action whose calls failed is not an error: the handler
/// returns the full `ActionResult` with a success status and callers inspect
/// the individual outcomes. Error statuses are reserved for unknown names,
/// invalid payloads, and pod-resolution failures.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(FanoutError::InvalidConfig(msg.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<FanoutError>() {
            match e {
                FanoutError::UnknownEndpoint(_)
                | FanoutError::UnknownTarget(_)
                | FanoutError::UnknownRequest(_)
                | FanoutError::UnknownAction(_) => StatusCode::NOT_FOUND,
                FanoutError::DuplicateName { .. }
                | FanoutError::InvalidConfig(_)
                | FanoutError::Yaml(_) => StatusCode::BAD_REQUEST,
                FanoutError::Resolution { .. } | FanoutError::Transport(_) => {
                    StatusCode::BAD_GATEWAY
                }
                FanoutError::Io(_) | FanoutError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
