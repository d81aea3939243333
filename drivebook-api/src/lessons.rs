use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use drivebook_catalog::{AddOn, LessonFilter, Offering, OfferingId};
use drivebook_order::{CatalogStep, DraftPayload, Page};
use serde::Serialize;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct LessonListResponse {
    pub lessons: Vec<Offering>,
    pub count: usize,
    pub filter: LessonFilter,
    pub locations: Vec<String>,
    pub vehicle_types: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SelectLessonResponse {
    pub next: &'static str,
    pub booking_data: DraftPayload,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/lessons", get(list_lessons))
        .route("/v1/lessons/{id}/select", post(select_lesson))
        .route("/v1/add-ons", get(list_add_ons))
}

async fn list_lessons(
    State(state): State<AppState>,
    Query(filter): Query<LessonFilter>,
) -> Json<LessonListResponse> {
    let step = CatalogStep::new(&state.catalog, filter);
    let lessons: Vec<Offering> = step.results().iter().map(|o| (*o).clone()).collect();

    Json(LessonListResponse {
        count: lessons.len(),
        lessons,
        filter: step.filter().clone(),
        locations: state.catalog.locations().into_iter().map(String::from).collect(),
        vehicle_types: state.catalog.vehicle_types().into_iter().map(String::from).collect(),
    })
}

/// The body is the filter the list was rendered with
async fn select_lesson(
    State(state): State<AppState>,
    Path(id): Path<OfferingId>,
    Json(filter): Json<LessonFilter>,
) -> Result<Json<SelectLessonResponse>, AppError> {
    let step = CatalogStep::new(&state.catalog, filter);
    let draft = step.select(id, &state.notifier)?;

    Ok(Json(SelectLessonResponse {
        next: Page::Checkout.path(),
        booking_data: draft.to_payload(),
    }))
}

async fn list_add_ons(State(state): State<AppState>) -> Json<Vec<AddOn>> {
    Json(state.catalog.add_ons().to_vec())
}
