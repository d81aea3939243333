use crate::models::FinalizedBooking;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// How long a finalized booking waits for its confirmation page
pub const DEFAULT_CONFIRMATION_WINDOW_SECS: i64 = 30 * 60;

/// Holds finalized bookings between checkout and the confirmation page.
///
/// Each booking can be taken exactly once; taking it destroys it. Bookings
/// whose confirmation page is never visited expire after the confirmation
/// window and are swept on the next `record`.
#[derive(Debug)]
pub struct BookingLedger {
    window: Duration,
    pending: Mutex<HashMap<Uuid, FinalizedBooking>>,
}

impl Default for BookingLedger {
    fn default() -> Self {
        Self::with_window(Duration::seconds(DEFAULT_CONFIRMATION_WINDOW_SECS))
    }
}

impl BookingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn record(&self, booking: FinalizedBooking) -> Uuid {
        let reference = booking.reference;
        let mut pending = self.pending();

        let now = Utc::now();
        let before = pending.len();
        pending.retain(|_, b| !self.expired(b.finalized_at, now));
        let swept = before - pending.len();
        if swept > 0 {
            tracing::info!(swept, "Expired unconfirmed bookings");
        }

        pending.insert(reference, booking);
        tracing::debug!(%reference, "Finalized booking awaiting confirmation");
        reference
    }

    /// Remove and return the booking, unless it has expired
    pub fn take(&self, reference: &Uuid) -> Option<FinalizedBooking> {
        let booking = self.pending().remove(reference)?;
        if self.expired(booking.finalized_at, Utc::now()) {
            tracing::debug!(%reference, "Booking confirmation window elapsed");
            return None;
        }
        Some(booking)
    }

    pub fn pending_count(&self) -> usize {
        self.pending().len()
    }

    fn expired(&self, finalized_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - finalized_at > self.window
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<Uuid, FinalizedBooking>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{engine, lesson};
    use crate::models::BookingDraft;
    use drivebook_core::payment::{PaymentIntent, PaymentStatus};
    use drivebook_shared::Money;

    fn booking() -> FinalizedBooking {
        let reference = Uuid::new_v4();
        let payment = PaymentIntent {
            id: "mock_pi_1".to_string(),
            reference,
            amount: Money::from_whole(60),
            description: "Lesson booking".to_string(),
            status: PaymentStatus::Succeeded,
            created_at: Utc::now(),
        };
        BookingDraft::new(lesson(1, 60)).finalize(&engine(), payment)
    }

    fn finalized_ago(minutes: i64) -> FinalizedBooking {
        let mut booking = booking();
        booking.finalized_at = Utc::now() - Duration::minutes(minutes);
        booking
    }

    #[test]
    fn test_booking_taken_exactly_once() {
        let ledger = BookingLedger::new();
        let booking = booking();
        let reference = booking.reference;

        assert_eq!(ledger.record(booking), reference);
        assert_eq!(ledger.pending_count(), 1);

        assert!(ledger.take(&reference).is_some());
        assert!(ledger.take(&reference).is_none());
        assert_eq!(ledger.pending_count(), 0);
    }

    #[test]
    fn test_unknown_reference() {
        let ledger = BookingLedger::new();
        assert!(ledger.take(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_abandoned_bookings_are_swept_on_record() {
        let ledger = BookingLedger::with_window(Duration::minutes(30));
        for _ in 0..1000 {
            ledger.record(finalized_ago(45));
        }
        // Each record sweeps the ones before it
        assert_eq!(ledger.pending_count(), 1);

        let fresh = ledger.record(booking());
        assert_eq!(ledger.pending_count(), 1);
        assert!(ledger.take(&fresh).is_some());
    }

    #[test]
    fn test_recent_bookings_survive_sweep() {
        let ledger = BookingLedger::with_window(Duration::minutes(30));
        let recent = ledger.record(finalized_ago(10));
        ledger.record(booking());

        assert_eq!(ledger.pending_count(), 2);
        assert!(ledger.take(&recent).is_some());
    }

    #[test]
    fn test_expired_booking_cannot_be_taken() {
        let ledger = BookingLedger::with_window(Duration::minutes(30));
        let stale = ledger.record(finalized_ago(31));

        assert!(ledger.take(&stale).is_none());
        assert_eq!(ledger.pending_count(), 0);
    }
}
