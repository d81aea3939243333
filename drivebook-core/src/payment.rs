use async_trait::async_trait;
use chrono::{DateTime, Utc};
use drivebook_shared::Money;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Succeeded,
    Declined,
}

/// Result of one capture attempt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentIntent {
    pub id: String, // Provider's ID (e.g., mock_pi_...)
    pub reference: Uuid,
    pub amount: Money,
    pub description: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl PaymentIntent {
    pub fn succeeded(&self) -> bool {
        self.status == PaymentStatus::Succeeded
    }
}

/// Opaque payment capture step.
///
/// Card collection happens outside this system; the flow only learns whether
/// the capture went through.
#[async_trait]
pub trait PaymentAdapter: Send + Sync {
    async fn capture(
        &self,
        reference: Uuid,
        amount: Money,
        description: &str,
    ) -> Result<PaymentIntent, Box<dyn std::error::Error + Send + Sync>>;
}

/// In-process adapter with a fixed answer
pub struct MockPaymentAdapter {
    approve: bool,
}

impl MockPaymentAdapter {
    pub fn approving() -> Self {
        Self { approve: true }
    }

    pub fn declining() -> Self {
        Self { approve: false }
    }
}

impl Default for MockPaymentAdapter {
    fn default() -> Self {
        Self::approving()
    }
}

#[async_trait]
impl PaymentAdapter for MockPaymentAdapter {
    async fn capture(
        &self,
        reference: Uuid,
        amount: Money,
        description: &str,
    ) -> Result<PaymentIntent, Box<dyn std::error::Error + Send + Sync>> {
        let status = if self.approve {
            PaymentStatus::Succeeded
        } else {
            PaymentStatus::Declined
        };

        tracing::info!(%reference, %amount, ?status, "Captured payment: {}", description);

        Ok(PaymentIntent {
            id: format!("mock_pi_{}", reference.simple()),
            reference,
            amount,
            description: description.to_string(),
            status,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_adapter_outcomes() {
        let reference = Uuid::new_v4();

        let intent = MockPaymentAdapter::approving()
            .capture(reference, Money::from_whole(50), "Joining fee")
            .await
            .unwrap();
        assert!(intent.succeeded());
        assert_eq!(intent.id, format!("mock_pi_{}", reference.simple()));
        assert_eq!(intent.amount, Money::from_whole(50));

        let intent = MockPaymentAdapter::declining()
            .capture(reference, Money::from_whole(50), "Joining fee")
            .await
            .unwrap();
        assert_eq!(intent.status, PaymentStatus::Declined);
    }
}
