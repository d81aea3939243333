use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use drivebook_order::ConfirmationStep;
use serde::Deserialize;
use uuid::Uuid;

use crate::{navigation::Navigate, state::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct ConfirmationRequest {
    #[serde(default)]
    pub reference: Option<Uuid>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/booking-confirmation", post(show_confirmation))
}

/// Renders a finalized booking once, and only to a logged-in visitor
async fn show_confirmation(
    State(state): State<AppState>,
    Json(req): Json<ConfirmationRequest>,
) -> Response {
    match ConfirmationStep::enter(req.reference, &state.ledger, &state.guard) {
        Ok(step) => Json(step.into_booking()).into_response(),
        Err(redirect) => Navigate(redirect).into_response(),
    }
}
