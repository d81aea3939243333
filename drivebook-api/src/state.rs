use drivebook_catalog::{LessonCatalog, PricingEngine};
use drivebook_core::account::AccountService;
use drivebook_core::payment::PaymentAdapter;
use drivebook_core::{Notifier, SessionBackend, SessionGate};
use drivebook_order::{BookingLedger, FlowGuard};
use drivebook_store::Config;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<LessonCatalog>,
    pub pricing: PricingEngine,
    pub session: SessionGate,
    pub accounts: AccountService,
    pub payments: Arc<dyn PaymentAdapter>,
    pub notifier: Notifier,
    pub ledger: Arc<BookingLedger>,
    pub guard: FlowGuard,
}

impl AppState {
    /// Wire every component around one session and one notice channel
    pub fn new(
        config: &Config,
        catalog: LessonCatalog,
        session_backend: Arc<dyn SessionBackend>,
        payments: Arc<dyn PaymentAdapter>,
    ) -> Self {
        let notifier = Notifier::default();
        let session = SessionGate::new(session_backend, notifier.clone());
        let accounts = AccountService::new(
            session.clone(),
            payments.clone(),
            notifier.clone(),
            config.business_rules.joining_fee,
        );
        let guard = FlowGuard::new(session.clone(), notifier.clone(), config.protected_pages());

        Self {
            catalog: Arc::new(catalog),
            pricing: PricingEngine::new(config.pricing()),
            session,
            accounts,
            payments,
            notifier,
            ledger: Arc::new(BookingLedger::with_window(config.confirmation_window())),
            guard,
        }
    }
}
