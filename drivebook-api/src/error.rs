use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use drivebook_catalog::CatalogError;
use drivebook_core::{CoreError, SessionError, ValidationErrors};
use drivebook_order::CheckoutError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    AuthenticationError(String),
    #[error(transparent)]
    ValidationError(ValidationErrors),
    #[error("{0}")]
    PaymentDeclined(String),
    #[error("{0}")]
    NotFoundError(String),
    #[error("{0}")]
    ConflictError(String),
    #[error("{0}")]
    UpstreamError(String),
    #[error("{0}")]
    InternalServerError(String),
    #[error(transparent)]
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, fields) = match self {
            AppError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                errors.to_string(),
                Some(errors.fields().clone()),
            ),
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            AppError::PaymentDeclined(msg) => (StatusCode::PAYMENT_REQUIRED, msg, None),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg, None),
            AppError::UpstreamError(msg) => {
                tracing::warn!("Upstream failure: {}", msg);
                (StatusCode::BAD_GATEWAY, msg, None)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string(), None)
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string(), None)
            }
        };

        let body = match fields {
            Some(fields) => json!({ "error": error_message, "fields": fields }),
            None => json!({ "error": error_message }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::ValidationError(errors)
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::LogoutPending | SessionError::Superseded => Self::ConflictError(err.to_string()),
            SessionError::Rejected(_) => Self::UpstreamError(err.to_string()),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(errors) => errors.into(),
            CoreError::Session(e) => e.into(),
            CoreError::PaymentDeclined(id) => Self::PaymentDeclined(format!("Payment declined ({})", id)),
            CoreError::InternalError(msg) => Self::InternalServerError(msg),
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::LoginRequired(_) => Self::AuthenticationError(err.to_string()),
            CheckoutError::PaymentDeclined(_) => Self::PaymentDeclined(err.to_string()),
            CheckoutError::PaymentFailed(msg) => Self::InternalServerError(msg),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::OfferingNotFound(_) | CatalogError::AddOnNotFound(_) => {
                Self::NotFoundError(err.to_string())
            }
            CatalogError::DuplicateOffering(_) | CatalogError::DuplicateAddOn(_) => {
                Self::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}
