pub mod models;
pub mod manager;
pub mod flow;

pub use models::{BookingDraft, DraftPayload, DraftStage, FinalizedBooking};
pub use manager::BookingLedger;
pub use flow::{CatalogStep, CheckoutError, CheckoutStep, ConfirmationStep, FlowGuard, Page, Redirect};
