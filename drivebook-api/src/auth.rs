use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use drivebook_core::payment::PaymentIntent;
use drivebook_core::validation::{LoginForm, RegistrationForm};
use drivebook_core::SessionState;
use drivebook_order::Page;
use serde::Serialize;

use crate::{error::AppError, navigation::Navigate, state::AppState};

#[derive(Debug, Serialize)]
struct SessionResponse {
    authenticated: bool,
    state: SessionState,
}

#[derive(Debug, Serialize)]
struct RegistrationResponse {
    authenticated: bool,
    payment: PaymentIntent,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/session", get(current_session))
        .route("/v1/session/login", post(login))
        .route("/v1/session/logout", post(logout))
        .route("/v1/register", post(register))
}

fn session_response(state: &AppState) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: state.session.is_authenticated(),
        state: state.session.state(),
    })
}

async fn current_session(State(state): State<AppState>) -> Json<SessionResponse> {
    session_response(&state)
}

async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> Result<Json<SessionResponse>, AppError> {
    state.accounts.login(&form)?;
    Ok(session_response(&state))
}

async fn logout(State(state): State<AppState>) -> Result<Json<SessionResponse>, AppError> {
    state.accounts.logout().await?;
    Ok(session_response(&state))
}

async fn register(
    State(state): State<AppState>,
    Json(form): Json<RegistrationForm>,
) -> Result<Response, AppError> {
    if let Err(redirect) = state.guard.enter(Page::Register) {
        return Ok(Navigate(redirect).into_response());
    }

    let payment = state.accounts.register(&form, Utc::now().date_naive()).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse {
            authenticated: state.session.is_authenticated(),
            payment,
        }),
    )
        .into_response())
}
