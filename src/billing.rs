//! Billing
//!
//! Booking charges are a whole number of hours at the slot's hourly
//! rate: the elapsed window is rounded up to the next full hour, so any
//! started hour bills in full.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Errors that can occur while pricing a booking window.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BillingError {
    /// The window's end does not come after its start.
    #[error("booking window must end after it starts")]
    EmptyWindow,

    /// The billed amount does not fit in minor units.
    #[error("billed amount overflows minor units")]
    AmountOverflow,
}

/// Number of whole hours billed for a window, rounding up.
///
/// A 90 minute window bills as two hours; an exact two hour window stays
/// at two.
///
/// # Errors
///
/// Returns [`BillingError::EmptyWindow`] if `ends` is not after `starts`.
pub fn billable_hours(starts: Timestamp, ends: Timestamp) -> Result<i64, BillingError> {
    let elapsed_ms = ends.as_millisecond() - starts.as_millisecond();

    if elapsed_ms <= 0 {
        return Err(BillingError::EmptyWindow);
    }

    // elapsed_ms is positive here, so the manual ceiling cannot wrap.
    Ok((elapsed_ms + MILLIS_PER_HOUR - 1) / MILLIS_PER_HOUR)
}

/// Total charge for a window at the given hourly rate.
///
/// # Errors
///
/// - [`BillingError::EmptyWindow`]: `ends` is not after `starts`.
/// - [`BillingError::AmountOverflow`]: the product of hours and rate does
///   not fit in minor units.
pub fn window_total(
    starts: Timestamp,
    ends: Timestamp,
    hourly_rate: &Money<'static, Currency>,
) -> Result<Money<'static, Currency>, BillingError> {
    let hours = billable_hours(starts, ends)?;

    let Some(total_minor) = hours.checked_mul(hourly_rate.to_minor_units()) else {
        return Err(BillingError::AmountOverflow);
    };

    Ok(Money::from_minor(total_minor, hourly_rate.currency()))
}
