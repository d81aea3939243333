use chrono::NaiveDate;
use drivebook_shared::{Money, Notice, NoticeKind};
use std::sync::Arc;
use uuid::Uuid;

use crate::payment::{PaymentAdapter, PaymentIntent};
use crate::session::SessionGate;
use crate::validation::{LoginForm, RegistrationForm};
use crate::{CoreError, CoreResult, Notifier};

/// Registration and login on top of the session gate
#[derive(Clone)]
pub struct AccountService {
    session: SessionGate,
    payments: Arc<dyn PaymentAdapter>,
    notifier: Notifier,
    joining_fee: Money,
}

impl AccountService {
    pub fn new(
        session: SessionGate,
        payments: Arc<dyn PaymentAdapter>,
        notifier: Notifier,
        joining_fee: Money,
    ) -> Self {
        Self {
            session,
            payments,
            notifier,
            joining_fee,
        }
    }

    pub fn joining_fee(&self) -> Money {
        self.joining_fee
    }

    /// Validate the form, charge the joining fee, then log the user in.
    ///
    /// Nothing is charged for an invalid form and no session starts unless
    /// the capture succeeds.
    pub async fn register(&self, form: &RegistrationForm, today: NaiveDate) -> CoreResult<PaymentIntent> {
        form.validate(today)?;

        let reference = Uuid::new_v4();
        let intent = self
            .payments
            .capture(reference, self.joining_fee, "Joining fee")
            .await
            .map_err(|e| CoreError::InternalError(format!("Payment capture failed: {}", e)))?;

        if !intent.succeeded() {
            tracing::warn!(%reference, "Joining fee declined");
            return Err(CoreError::PaymentDeclined(intent.id));
        }

        self.session.begin_session();
        self.notifier.notify(
            Notice::new(NoticeKind::RegistrationSucceeded).with_description(format!(
                "Welcome aboard! Your {} joining fee has been processed.",
                self.joining_fee
            )),
        );

        Ok(intent)
    }

    pub fn login(&self, form: &LoginForm) -> CoreResult<()> {
        form.validate()?;
        self.session.begin_session();
        self.notifier.notify_kind(NoticeKind::LoginSucceeded);
        Ok(())
    }

    /// The gate publishes the success or failure notice itself
    pub async fn logout(&self) -> CoreResult<()> {
        self.session.end_session().await?;
        Ok(())
    }
}
