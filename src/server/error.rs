use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use unibank::notify::SendOutcome;

/// Any delivery failure maps to a 500 with the mailer's failure body.
pub(crate) struct ServerError(anyhow::Error);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = SendOutcome {
            success: false,
            message: "Failed to send email".to_owned(),
            error: Some(self.0.to_string()),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

impl<E> From<E> for ServerError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
