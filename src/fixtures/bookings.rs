//! Booking Fixtures

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::bookings::{BookingStatus, PaymentStatus};

/// Wrapper for bookings in YAML
#[derive(Debug, Deserialize)]
pub struct BookingsFixture {
    /// Map of booking key -> booking fixture
    pub bookings: FxHashMap<String, BookingFixture>,
}

/// Booking fixture from YAML
///
/// References its location by fixture key and its slot by number; both are
/// resolved against the ledger when the fixture set is loaded.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BookingFixture {
    /// User who holds the booking
    pub user_id: String,

    /// Fixture key of the location booked
    pub location: String,

    /// Slot number within the location
    pub slot_number: u32,

    /// Start of the booked window (RFC 3339)
    pub starts: Timestamp,

    /// End of the booked window (RFC 3339)
    pub ends: Timestamp,

    /// Amount charged (e.g. "20.00 USD")
    pub total_amount: String,

    /// Stored lifecycle status
    pub status: BookingStatus,

    /// Payment status
    pub payment_status: PaymentStatus,

    /// Vehicle registration, if recorded
    pub vehicle_number: Option<String>,
}
