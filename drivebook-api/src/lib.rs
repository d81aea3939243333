use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod checkout;
pub mod confirmation;
pub mod error;
pub mod lessons;
pub mod navigation;
pub mod notices;
pub mod pages;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::ACCEPT])
        .expose_headers([axum::http::header::LOCATION]);

    Router::new()
        .merge(lessons::routes())
        .merge(checkout::routes())
        .merge(confirmation::routes())
        .merge(auth::routes())
        .merge(pages::routes())
        .merge(notices::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
