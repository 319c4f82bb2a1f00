use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::services::tryon::TryOnError;
use crate::services::vision::VisionError;

/// Outward error surface: every failure becomes a status code plus
/// `{"error": "<message>"}`. Nothing crashes the process.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
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

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<TryOnError> for ApiError {
    fn from(err: TryOnError) -> Self {
        let status = match &err {
            TryOnError::Precondition(_) | TryOnError::Provider { .. } => StatusCode::BAD_REQUEST,
            // Pass the provider's transport status through to the caller.
            TryOnError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            TryOnError::Http(_) => StatusCode::BAD_GATEWAY,
            TryOnError::Timeout => StatusCode::REQUEST_TIMEOUT,
        };
        Self::new(status, err.to_string())
    }
}

impl From<VisionError> for ApiError {
    fn from(err: VisionError) -> Self {
        let status = match &err {
            VisionError::InvalidImage => StatusCode::BAD_REQUEST,
            _ => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tryon_errors_map_to_spec_status_codes() {
        let cases = [
            (TryOnError::Precondition("missing image".into()), StatusCode::BAD_REQUEST),
            (TryOnError::Provider { message: "bad image".into() }, StatusCode::BAD_REQUEST),
            (TryOnError::Upstream { status: 503, body: String::new() }, StatusCode::SERVICE_UNAVAILABLE),
            (TryOnError::Timeout, StatusCode::REQUEST_TIMEOUT),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }
}
