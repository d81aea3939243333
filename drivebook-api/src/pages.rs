use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use drivebook_core::validation::ContactForm;
use drivebook_order::Page;
use drivebook_shared::{Notice, NoticeKind};
use serde::Serialize;

use crate::{error::AppError, navigation::Navigate, state::AppState};

#[derive(Debug, Serialize)]
struct PageResponse {
    page: Page,
    path: &'static str,
    authenticated: bool,
}

#[derive(Debug, Serialize)]
struct ContactResponse {
    received: bool,
    notice: Notice,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/pages/{page}", get(enter_page))
        .route("/v1/contact", post(contact))
}

/// Runs the guard for pages that need no payload
async fn enter_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let page = Page::from_slug(&slug)
        .ok_or_else(|| AppError::NotFoundError(format!("Unknown page: {}", slug)))?;

    Ok(match state.guard.enter(page) {
        Ok(()) => Json(PageResponse {
            page,
            path: page.path(),
            authenticated: state.session.is_authenticated(),
        })
        .into_response(),
        Err(redirect) => Navigate(redirect).into_response(),
    })
}

async fn contact(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<Response, AppError> {
    if let Err(redirect) = state.guard.require_session(Page::Contact) {
        return Ok(Navigate(redirect).into_response());
    }

    form.validate()?;
    tracing::info!(subject = %form.subject, "Contact message received");
    let notice = state.notifier.notify_kind(NoticeKind::ContactReceived);

    Ok(Json(ContactResponse {
        received: true,
        notice,
    })
    .into_response())
}
