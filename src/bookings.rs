//! Bookings

use std::fmt;

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use slotmap::new_key_type;

use crate::{
    locations::LocationKey,
    slots::{SlotKey, VehicleType},
};

new_key_type! {
    /// Booking Key
    pub struct BookingKey;
}

/// Lifecycle state of a booking.
///
/// Progression is one-way: `Active` moves to `Completed` (time passing)
/// or `Cancelled` (explicit, inside the cancellation window). Both are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    /// Booking is current or upcoming.
    Active,

    /// Booking window has ended.
    Completed,

    /// Booking was cancelled before its start.
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Payment outcome recorded on a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentStatus {
    /// Payment captured.
    Paid,

    /// Payment not yet settled.
    Pending,

    /// Payment attempt failed.
    Failed,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paid => write!(f, "paid"),
            Self::Pending => write!(f, "pending"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Input for creating a booking.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    /// User making the booking.
    pub user_id: String,

    /// Location being booked.
    pub location: LocationKey,

    /// Slot being booked.
    pub slot: SlotKey,

    /// Start of the booking window.
    pub starts: Timestamp,

    /// End of the booking window; must be after `starts`.
    pub ends: Timestamp,

    /// Vehicle registration plate, if supplied.
    pub vehicle_number: Option<String>,
}

/// A booking of one slot for one time window.
///
/// Location name and slot number are denormalized at creation so the
/// booking stays displayable after its location is removed.
#[derive(Debug, Clone)]
pub struct Booking {
    user_id: String,
    location: LocationKey,
    slot: SlotKey,
    location_name: String,
    slot_number: u32,
    starts: Timestamp,
    ends: Timestamp,
    total_amount: Money<'static, Currency>,
    status: BookingStatus,
    payment_status: PaymentStatus,
    vehicle_type: VehicleType,
    vehicle_number: Option<String>,
}

impl Booking {
    pub(crate) fn new(
        request: BookingRequest,
        location_name: String,
        slot_number: u32,
        vehicle_type: VehicleType,
        total_amount: Money<'static, Currency>,
        payment_status: PaymentStatus,
    ) -> Self {
        Self {
            user_id: request.user_id,
            location: request.location,
            slot: request.slot,
            location_name,
            slot_number,
            starts: request.starts,
            ends: request.ends,
            total_amount,
            status: BookingStatus::Active,
            payment_status,
            vehicle_type,
            vehicle_number: request.vehicle_number,
        }
    }

    /// User who made the booking.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Key of the booked location.
    #[must_use]
    pub fn location(&self) -> LocationKey {
        self.location
    }

    /// Key of the booked slot.
    #[must_use]
    pub fn slot(&self) -> SlotKey {
        self.slot
    }

    /// Location name captured at booking time.
    #[must_use]
    pub fn location_name(&self) -> &str {
        &self.location_name
    }

    /// Slot number captured at booking time.
    #[must_use]
    pub fn slot_number(&self) -> u32 {
        self.slot_number
    }

    /// Start of the booking window.
    #[must_use]
    pub fn starts(&self) -> Timestamp {
        self.starts
    }

    /// End of the booking window.
    #[must_use]
    pub fn ends(&self) -> Timestamp {
        self.ends
    }

    /// Total amount billed for the window.
    #[must_use]
    pub fn total_amount(&self) -> &Money<'static, Currency> {
        &self.total_amount
    }

    /// Stored status, ignoring the passage of time. Most callers want
    /// [`Booking::status_at`].
    #[must_use]
    pub fn stored_status(&self) -> BookingStatus {
        self.status
    }

    /// Effective status at `now`: a stored-active booking whose end has
    /// passed reads as completed. No explicit completion operation
    /// exists; completion is purely an on-read transition.
    #[must_use]
    pub fn status_at(&self, now: Timestamp) -> BookingStatus {
        match self.status {
            BookingStatus::Active if now > self.ends => BookingStatus::Completed,
            status => status,
        }
    }

    /// Payment outcome recorded for this booking.
    #[must_use]
    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    /// Vehicle class of the booked slot.
    #[must_use]
    pub fn vehicle_type(&self) -> VehicleType {
        self.vehicle_type
    }

    /// Vehicle registration plate, if supplied.
    #[must_use]
    pub fn vehicle_number(&self) -> Option<&str> {
        self.vehicle_number.as_deref()
    }

    pub(crate) fn set_status(&mut self, status: BookingStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use rusty_money::iso;
    use slotmap::SlotMap;

    use super::*;

    fn test_booking(starts: Timestamp, ends: Timestamp) -> Booking {
        let mut locations: SlotMap<LocationKey, ()> = SlotMap::with_key();
        let mut slots: SlotMap<SlotKey, ()> = SlotMap::with_key();

        let request = BookingRequest {
            user_id: "user-1".to_owned(),
            location: locations.insert(()),
            slot: slots.insert(()),
            starts,
            ends,
            vehicle_number: Some("ABC123".to_owned()),
        };

        Booking::new(
            request,
            "Downtown Parking Plaza".to_owned(),
            1,
            VehicleType::Car,
            Money::from_minor(2000, iso::USD),
            PaymentStatus::Paid,
        )
    }

    #[test]
    fn active_booking_reads_active_before_its_end() {
        let now = Timestamp::UNIX_EPOCH;
        let booking = test_booking(now, now + 4.hours());

        assert_eq!(booking.status_at(now + 2.hours()), BookingStatus::Active);
    }

    #[test]
    fn active_booking_reads_completed_after_its_end() {
        let now = Timestamp::UNIX_EPOCH;
        let booking = test_booking(now, now + 4.hours());

        assert_eq!(
            booking.status_at(now + 5.hours()),
            BookingStatus::Completed
        );
        assert_eq!(booking.stored_status(), BookingStatus::Active);
    }

    #[test]
    fn cancelled_booking_stays_cancelled_past_its_end() {
        let now = Timestamp::UNIX_EPOCH;
        let mut booking = test_booking(now, now + 4.hours());
        booking.set_status(BookingStatus::Cancelled);

        assert_eq!(
            booking.status_at(now + 5.hours()),
            BookingStatus::Cancelled
        );
    }
}
