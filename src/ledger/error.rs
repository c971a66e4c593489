//! Ledger errors

use thiserror::Error;

use crate::{
    billing::BillingError,
    bookings::{BookingKey, BookingStatus},
    locations::{LocationKey, MAX_LOCATION_SLOTS},
    slots::{SlotKey, SlotStatus},
};

/// Malformed input, rejected before any state changes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The requested slot count is outside `1..=MAX_LOCATION_SLOTS`.
    #[error("total slots must be between 1 and {MAX_LOCATION_SLOTS}, got {0}")]
    SlotCountOutOfRange(u32),

    /// A required profile field was left empty.
    #[error("required field `{0}` must not be empty")]
    MissingField(&'static str),

    /// A location needs at least one price rule to seed slot prices from.
    #[error("at least one price rule is required")]
    NoPriceRules,

    /// A slot price must not be negative.
    #[error("slot price must not be negative")]
    NegativePrice,

    /// A money amount's currency differs from the ledger currency.
    #[error("amount has currency {actual}, but the ledger uses {expected}")]
    CurrencyMismatch {
        /// Currency the ledger was created with
        expected: &'static str,

        /// Currency of the offending amount
        actual: &'static str,
    },

    /// A booking window must end after it starts.
    #[error("booking window must end after it starts")]
    EmptyWindow,

    /// A booking window must not start in the past.
    #[error("booking window must not start in the past")]
    StartInPast,
}

/// Errors returned by ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Malformed input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No location exists for the given key.
    #[error("location {0:?} not found")]
    LocationNotFound(LocationKey),

    /// No slot exists for the given key within the addressed location.
    #[error("slot {0:?} not found in location")]
    SlotNotFound(SlotKey),

    /// No booking exists for the given key, or the acting user may not
    /// see it.
    #[error("booking {0:?} not found")]
    BookingNotFound(BookingKey),

    /// A booking was attempted on a slot that is not available.
    #[error("slot {number} is {status}, not available")]
    SlotUnavailable {
        /// Number of the addressed slot
        number: u32,

        /// Status the slot was found in
        status: SlotStatus,
    },

    /// A toggle was attempted on a booked slot; booked slots must be
    /// released first.
    #[error("slot {0} is booked and cannot be toggled")]
    SlotBooked(u32),

    /// A release was attempted on a slot that is not booked.
    #[error("slot {0} is not booked")]
    SlotNotBooked(u32),

    /// A cancellation was attempted on a booking that is not active.
    #[error("booking is {0}, not active")]
    BookingNotActive(BookingStatus),

    /// A cancellation was attempted less than one hour before the
    /// booking starts.
    #[error("bookings can only be cancelled more than one hour before they start")]
    CancellationWindowClosed,

    /// Billing arithmetic error while pricing the window.
    #[error(transparent)]
    Billing(#[from] BillingError),
}
