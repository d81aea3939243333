//! Page flow: Catalog → Checkout → Confirmation.
//!
//! Each step is built from the payload the previous step handed over. A
//! missing or unusable payload does not produce an error; the constructor
//! returns a [`Redirect`] to a safe earlier page instead.

use drivebook_catalog::{AddOn, CatalogError, LessonCatalog, LessonFilter, Offering, OfferingId, PriceQuote, PricingEngine};
use drivebook_core::payment::PaymentAdapter;
use drivebook_core::{Notifier, SessionGate};
use drivebook_shared::{Notice, NoticeKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::manager::BookingLedger;
use crate::models::{BookingDraft, FinalizedBooking};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Home,
    #[serde(rename = "lessons")]
    Catalog,
    Checkout,
    #[serde(rename = "booking-confirmation")]
    Confirmation,
    Register,
    Contact,
}

impl Page {
    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Catalog => "/lessons",
            Page::Checkout => "/checkout",
            Page::Confirmation => "/booking-confirmation",
            Page::Register => "/register",
            Page::Contact => "/contact",
        }
    }

    /// Parse the path segment used in URLs and config (`lessons`, `checkout`, ...)
    pub fn from_slug(slug: &str) -> Option<Page> {
        match slug.trim().trim_start_matches('/') {
            "" | "home" => Some(Page::Home),
            "lessons" => Some(Page::Catalog),
            "checkout" => Some(Page::Checkout),
            "booking-confirmation" => Some(Page::Confirmation),
            "register" => Some(Page::Register),
            "contact" => Some(Page::Contact),
            _ => None,
        }
    }
}

/// Precondition not met: go to `to` instead, optionally telling the user why
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Redirect {
    pub to: Page,
    pub notice: Option<Notice>,
}

impl Redirect {
    pub fn to(page: Page) -> Self {
        Self { to: page, notice: None }
    }
}

/// Session-based page gating
#[derive(Debug, Clone)]
pub struct FlowGuard {
    session: SessionGate,
    notifier: Notifier,
    protected: HashSet<Page>,
}

impl FlowGuard {
    pub fn new(session: SessionGate, notifier: Notifier, protected: impl IntoIterator<Item = Page>) -> Self {
        Self {
            session,
            notifier,
            protected: protected.into_iter().collect(),
        }
    }

    pub fn session(&self) -> &SessionGate {
        &self.session
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn is_protected(&self, page: Page) -> bool {
        self.protected.contains(&page)
    }

    /// Send anonymous visitors of a protected page to the login page, with
    /// exactly one "please log in" notice.
    pub fn require_session(&self, page: Page) -> Result<(), Redirect> {
        if !self.is_protected(page) || self.session.is_authenticated() {
            return Ok(());
        }

        tracing::info!(page = page.path(), "Login required");
        Err(self.login_required())
    }

    /// Redirect to the login page, publishing one "please log in" notice
    pub fn login_required(&self) -> Redirect {
        let notice = self.notifier.notify_kind(NoticeKind::LoginRequired);
        Redirect {
            to: Page::Register,
            notice: Some(notice),
        }
    }

    /// Guard for pages that carry no payload
    pub fn enter(&self, page: Page) -> Result<(), Redirect> {
        match page {
            Page::Register if self.session.is_authenticated() => Err(Redirect::to(Page::Catalog)),
            Page::Checkout | Page::Confirmation => Err(Redirect::to(Page::Catalog)),
            _ => self.require_session(page),
        }
    }
}

/// Filtered lesson list
#[derive(Debug)]
pub struct CatalogStep<'a> {
    catalog: &'a LessonCatalog,
    filter: LessonFilter,
    results: Vec<&'a Offering>,
}

impl<'a> CatalogStep<'a> {
    pub fn new(catalog: &'a LessonCatalog, filter: LessonFilter) -> Self {
        let results = catalog.search(&filter);
        Self {
            catalog,
            filter,
            results,
        }
    }

    pub fn filter(&self) -> &LessonFilter {
        &self.filter
    }

    pub fn results(&self) -> &[&'a Offering] {
        &self.results
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Start a draft for one of the displayed lessons
    pub fn select(&self, id: OfferingId, notifier: &Notifier) -> Result<BookingDraft, CatalogError> {
        let offering = self.catalog.select(&self.filter, id)?;
        tracing::info!(offering_id = id, "Lesson selected");
        notifier.notify_kind(NoticeKind::LessonSelected);
        Ok(BookingDraft::new(offering.clone()))
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CheckoutError {
    /// Nothing was charged; the visitor must log in first
    #[error("Login required to confirm a booking")]
    LoginRequired(Redirect),

    #[error("Payment declined: {0}")]
    PaymentDeclined(String),

    #[error("Payment capture failed: {0}")]
    PaymentFailed(String),
}

/// Quantity and add-on configuration for one draft
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutStep {
    draft: BookingDraft,
}

impl CheckoutStep {
    /// Requires a draft; without one the visitor goes back to the catalog.
    pub fn enter(draft: Option<BookingDraft>, guard: &FlowGuard) -> Result<Self, Redirect> {
        let Some(draft) = draft else {
            tracing::debug!("Checkout without a selected lesson");
            return Err(Redirect::to(Page::Catalog));
        };
        guard.require_session(Page::Checkout)?;
        Ok(Self { draft })
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn into_draft(self) -> BookingDraft {
        self.draft
    }

    pub fn increment(&mut self) {
        self.draft.increment();
    }

    pub fn decrement(&mut self) {
        self.draft.decrement();
    }

    pub fn toggle_add_on(&mut self, add_on: &AddOn) -> bool {
        self.draft.toggle_add_on(add_on)
    }

    pub fn quote(&self, engine: &PricingEngine) -> PriceQuote {
        self.draft.quote(engine)
    }

    /// Capture payment for the current total and freeze the draft.
    ///
    /// Only a logged-in visitor is charged, since the booking can only be
    /// shown on the confirmation page to a logged-in visitor.
    pub async fn confirm(
        self,
        engine: &PricingEngine,
        payments: &dyn PaymentAdapter,
        guard: &FlowGuard,
    ) -> Result<FinalizedBooking, CheckoutError> {
        if !guard.session().is_authenticated() {
            tracing::info!("Booking confirmation attempted without a session");
            return Err(CheckoutError::LoginRequired(guard.login_required()));
        }

        guard.notifier().notify_kind(NoticeKind::BookingProcessing);

        let quote = self.draft.quote(engine);
        let reference = Uuid::new_v4();
        let description = format!(
            "{} x lesson on {} with {}",
            quote.quantity,
            self.draft.offering().date,
            self.draft.offering().instructor
        );

        let intent = payments
            .capture(reference, quote.total, &description)
            .await
            .map_err(|e| CheckoutError::PaymentFailed(e.to_string()))?;

        if !intent.succeeded() {
            tracing::warn!(%reference, "Booking payment declined");
            return Err(CheckoutError::PaymentDeclined(intent.id));
        }

        let booking = self.draft.finalize(engine, intent);
        tracing::info!(
            reference = %booking.reference,
            quantity = booking.quantity,
            total = %booking.total,
            "Booking finalized"
        );
        Ok(booking)
    }
}

/// Read-only view of a finalized booking
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationStep {
    booking: FinalizedBooking,
}

impl ConfirmationStep {
    /// Needs a logged-in session and a pending booking for `reference`.
    /// Either one missing sends the visitor to the catalog with no further
    /// detail. The session is checked first, so an anonymous visit leaves
    /// the booking in the ledger.
    pub fn enter(
        reference: Option<Uuid>,
        ledger: &BookingLedger,
        guard: &FlowGuard,
    ) -> Result<Self, Redirect> {
        if !guard.session().is_authenticated() {
            tracing::debug!("Confirmation visited without a session");
            return Err(Redirect::to(Page::Catalog));
        }

        match reference.and_then(|reference| ledger.take(&reference)) {
            Some(booking) => Ok(Self { booking }),
            None => {
                tracing::debug!(?reference, "No pending booking to confirm");
                Err(Redirect::to(Page::Catalog))
            }
        }
    }

    pub fn booking(&self) -> &FinalizedBooking {
        &self.booking
    }

    /// Consume the step; the booking is not available afterwards
    pub fn into_booking(self) -> FinalizedBooking {
        self.booking
    }
}
