//! Booking desk
//!
//! [`BookingDesk`] is the orchestration over the ledger: validate the
//! request, price the window, run the payment, then record the booking
//! with the settled outcome. A declined or abandoned payment writes
//! nothing to the ledger.

use jiff::Timestamp;
use thiserror::Error;
use tracing::{Span, info};

use crate::{
    bookings::{BookingKey, BookingRequest},
    ledger::{LedgerError, ParkingLedger},
    services::payment::{PaymentError, PaymentProcessor},
};

/// Errors surfaced while booking through the desk.
#[derive(Debug, Error)]
pub enum DeskError {
    /// The payment step failed; the ledger is untouched.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// A ledger operation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Orchestrates quoting, payment and recording against one ledger.
#[derive(Debug)]
pub struct BookingDesk<P> {
    processor: P,
}

impl<P: PaymentProcessor> BookingDesk<P> {
    /// Creates a desk that charges through the given processor.
    pub fn new(processor: P) -> Self {
        Self { processor }
    }

    /// Books a slot end to end.
    ///
    /// The request is validated before the charge so a doomed booking
    /// never reaches the payment step. The ledger stays exclusively
    /// borrowed across the payment await, so no other mutation can
    /// interleave with the check.
    ///
    /// # Errors
    ///
    /// - [`DeskError::Payment`]: the charge was declined.
    /// - [`DeskError::Ledger`]: validation, lookup or availability
    ///   failures.
    #[tracing::instrument(
        name = "desk.book_slot",
        skip(self, ledger, request),
        fields(
            user_id = %request.user_id,
            amount = tracing::field::Empty,
            booking = tracing::field::Empty
        ),
        err
    )]
    pub async fn book_slot(
        &self,
        ledger: &mut ParkingLedger,
        request: BookingRequest,
        now: Timestamp,
    ) -> Result<BookingKey, DeskError> {
        ledger.check_bookable(&request, now)?;

        let amount = ledger.quote(request.location, request.slot, request.starts, request.ends)?;

        let span = Span::current();
        span.record("amount", tracing::field::display(&amount));

        let payment_status = self.processor.charge(&request.user_id, &amount).await?;

        let booking = ledger.create_booking(request, payment_status, now)?;

        span.record("booking", tracing::field::debug(booking));
        info!(amount = %amount, "recorded booking");

        Ok(booking)
    }

    /// Cancels a booking on behalf of the acting user.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Ledger`] when the booking is missing, not
    /// owned by the acting user, not active, or inside the one-hour
    /// cancellation window.
    #[tracing::instrument(
        name = "desk.cancel_booking",
        skip(self, ledger),
        fields(user_id = %acting_user),
        err
    )]
    pub fn cancel_booking(
        &self,
        ledger: &mut ParkingLedger,
        booking: BookingKey,
        acting_user: &str,
        now: Timestamp,
    ) -> Result<(), DeskError> {
        ledger.cancel_booking(booking, acting_user, now)?;

        info!(booking = ?booking, "cancelled booking");

        Ok(())
    }
}
