use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use drivebook_catalog::{AddOnId, CatalogError, Offering, PriceQuote};
use drivebook_order::{BookingDraft, CheckoutError, CheckoutStep, DraftPayload, Page};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, navigation::Navigate, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub booking_data: Option<DraftPayload>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityAction {
    Increment,
    Decrement,
}

#[derive(Debug, Deserialize)]
pub struct QuantityRequest {
    #[serde(default)]
    pub booking_data: Option<DraftPayload>,
    pub action: QuantityAction,
}

/// Everything the checkout page renders, plus the payload for the next call
#[derive(Debug, Serialize)]
pub struct CheckoutView {
    pub booking_data: DraftPayload,
    pub offering: Offering,
    pub selected_add_ons: Vec<AddOnId>,
    pub quote: PriceQuote,
    pub subtotal_display: String,
    pub discount_display: String,
    pub total_display: String,
    pub discount_threshold: u32,
}

#[derive(Debug, Serialize)]
pub struct ConfirmCheckoutResponse {
    pub reference: Uuid,
    pub next: &'static str,
    pub total_price: String,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/checkout", post(enter_checkout))
        .route("/v1/checkout/quantity", post(change_quantity))
        .route("/v1/checkout/add-ons/{id}/toggle", post(toggle_add_on))
        .route("/v1/checkout/confirm", post(confirm_checkout))
}

/// A missing or unresolvable payload is treated the same way
fn resolve(state: &AppState, payload: Option<DraftPayload>) -> Option<BookingDraft> {
    let draft = payload.as_ref().and_then(|p| p.resolve(&state.catalog));
    if payload.is_some() && draft.is_none() {
        tracing::warn!(?payload, "Discarding malformed booking payload");
    }
    draft
}

fn view(state: &AppState, step: &CheckoutStep) -> CheckoutView {
    let draft = step.draft();
    let quote = step.quote(&state.pricing);

    CheckoutView {
        booking_data: draft.to_payload(),
        offering: draft.offering().clone(),
        selected_add_ons: draft.add_ons().map(|a| a.id).collect(),
        subtotal_display: state.pricing.format(quote.subtotal),
        discount_display: state.pricing.format(quote.discount_amount),
        total_display: state.pricing.format(quote.total),
        discount_threshold: state.pricing.config().discount_threshold,
        quote,
    }
}

async fn enter_checkout(
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> Response {
    match CheckoutStep::enter(resolve(&state, req.booking_data), &state.guard) {
        Ok(step) => Json(view(&state, &step)).into_response(),
        Err(redirect) => Navigate(redirect).into_response(),
    }
}

async fn change_quantity(
    State(state): State<AppState>,
    Json(req): Json<QuantityRequest>,
) -> Response {
    let mut step = match CheckoutStep::enter(resolve(&state, req.booking_data), &state.guard) {
        Ok(step) => step,
        Err(redirect) => return Navigate(redirect).into_response(),
    };

    match req.action {
        QuantityAction::Increment => step.increment(),
        QuantityAction::Decrement => step.decrement(),
    }

    Json(view(&state, &step)).into_response()
}

async fn toggle_add_on(
    State(state): State<AppState>,
    Path(id): Path<AddOnId>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Response, AppError> {
    let mut step = match CheckoutStep::enter(resolve(&state, req.booking_data), &state.guard) {
        Ok(step) => step,
        Err(redirect) => return Ok(Navigate(redirect).into_response()),
    };

    let add_on = state.catalog.add_on(id).ok_or(CatalogError::AddOnNotFound(id))?;
    let selected = step.toggle_add_on(add_on);
    tracing::debug!(add_on_id = id, selected, "Toggled add-on");

    Ok(Json(view(&state, &step)).into_response())
}

async fn confirm_checkout(
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Response, AppError> {
    let step = match CheckoutStep::enter(resolve(&state, req.booking_data), &state.guard) {
        Ok(step) => step,
        Err(redirect) => return Ok(Navigate(redirect).into_response()),
    };

    let booking = match step
        .confirm(&state.pricing, state.payments.as_ref(), &state.guard)
        .await
    {
        Ok(booking) => booking,
        Err(CheckoutError::LoginRequired(redirect)) => return Ok(Navigate(redirect).into_response()),
        Err(e) => return Err(e.into()),
    };

    let total_price = booking.total_price.clone();
    let reference = state.ledger.record(booking);

    Ok((
        StatusCode::CREATED,
        Json(ConfirmCheckoutResponse {
            reference,
            next: Page::Confirmation.path(),
            total_price,
        }),
    )
        .into_response())
}
