//! Payment processing
//!
//! No real gateway is wired up. [`SimulatedCardPayment`] stands in for
//! one: it waits a fixed settlement delay and then reports the charge as
//! paid. The delay carries no cancellation semantics; an abandoned
//! future simply never settles.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::bookings::PaymentStatus;

/// Errors surfaced by a payment processor.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The processor declined the charge.
    #[error("payment declined: {0}")]
    Declined(String),
}

/// Charges users for bookings.
#[automock]
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Charges the user the given amount, returning the settled outcome.
    async fn charge(
        &self,
        user_id: &str,
        amount: &Money<'static, Currency>,
    ) -> Result<PaymentStatus, PaymentError>;
}

/// Stand-in card processor with a fixed settlement delay.
#[derive(Debug, Clone)]
pub struct SimulatedCardPayment {
    delay: Duration,
}

impl SimulatedCardPayment {
    /// Default settlement delay.
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

    /// Creates a processor with the default settlement delay.
    #[must_use]
    pub fn new() -> Self {
        Self::with_delay(Self::DEFAULT_DELAY)
    }

    /// Creates a processor with a custom settlement delay.
    #[must_use]
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedCardPayment {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentProcessor for SimulatedCardPayment {
    async fn charge(
        &self,
        _user_id: &str,
        _amount: &Money<'static, Currency>,
    ) -> Result<PaymentStatus, PaymentError> {
        tokio::time::sleep(self.delay).await;

        Ok(PaymentStatus::Paid)
    }
}

/// Processor that settles immediately; for tests and demos that skip the
/// artificial delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantPayment;

#[async_trait]
impl PaymentProcessor for InstantPayment {
    async fn charge(
        &self,
        _user_id: &str,
        _amount: &Money<'static, Currency>,
    ) -> Result<PaymentStatus, PaymentError> {
        Ok(PaymentStatus::Paid)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn simulated_processor_settles_as_paid() -> TestResult {
        let processor = SimulatedCardPayment::with_delay(Duration::ZERO);
        let amount = Money::from_minor(2000, USD);

        let outcome = processor.charge("user-1", &amount).await?;

        assert_eq!(outcome, PaymentStatus::Paid);

        Ok(())
    }

    #[tokio::test]
    async fn instant_processor_settles_as_paid() -> TestResult {
        let amount = Money::from_minor(2000, USD);

        let outcome = InstantPayment.charge("user-1", &amount).await?;

        assert_eq!(outcome, PaymentStatus::Paid);

        Ok(())
    }
}
