use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use drivebook_order::Redirect;
use serde_json::json;

/// A guard redirect rendered as `303 See Other`.
///
/// The body repeats the target and carries the notice, if any, so clients
/// that do not follow `Location` can still show it.
#[derive(Debug)]
pub struct Navigate(pub Redirect);

impl IntoResponse for Navigate {
    fn into_response(self) -> Response {
        let Redirect { to, notice } = self.0;
        tracing::debug!(to = to.path(), "Redirecting");

        (
            StatusCode::SEE_OTHER,
            [(header::LOCATION, to.path())],
            Json(json!({
                "redirect_to": to.path(),
                "notice": notice,
            })),
        )
            .into_response()
    }
}

impl From<Redirect> for Navigate {
    fn from(redirect: Redirect) -> Self {
        Self(redirect)
    }
}
