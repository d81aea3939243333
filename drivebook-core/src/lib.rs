pub mod account;
pub mod notify;
pub mod payment;
pub mod session;
pub mod validation;

pub use notify::Notifier;
pub use session::{SessionBackend, SessionError, SessionGate, SessionState, SimulatedBackend};
pub use validation::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Payment declined: {0}")]
    PaymentDeclined(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
