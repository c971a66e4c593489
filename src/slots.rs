//! Parking slots

use std::fmt;

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use slotmap::new_key_type;

new_key_type! {
    /// Parking Slot Key
    pub struct SlotKey;
}

/// Lifecycle state of a single parking slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlotStatus {
    /// Open for booking.
    Available,

    /// Held by a booking.
    Booked,

    /// Taken out of service by the dealer.
    Disabled,
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Booked => write!(f, "booked"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

/// Vehicle class a slot or price rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VehicleType {
    /// Standard car bay.
    Car,

    /// Two-wheeler bay.
    Bike,

    /// Van / light commercial bay.
    Van,

    /// Truck / heavy vehicle bay.
    Truck,
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Car => write!(f, "car"),
            Self::Bike => write!(f, "bike"),
            Self::Van => write!(f, "van"),
            Self::Truck => write!(f, "truck"),
        }
    }
}

/// A single parking slot within a location.
///
/// Slots are numbered sequentially from 1 within their location. The
/// `booked_by` / `booked_until` pair is populated only while the status
/// is [`SlotStatus::Booked`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParkingSlot {
    number: u32,
    status: SlotStatus,
    vehicle_type: VehicleType,
    hourly_price: Money<'static, Currency>,
    booked_by: Option<String>,
    booked_until: Option<Timestamp>,
}

impl ParkingSlot {
    /// Creates a new available slot with the given number and hourly price.
    pub fn new(number: u32, vehicle_type: VehicleType, hourly_price: Money<'static, Currency>) -> Self {
        Self {
            number,
            status: SlotStatus::Available,
            vehicle_type,
            hourly_price,
            booked_by: None,
            booked_until: None,
        }
    }

    /// Sequential number of the slot within its location, starting at 1.
    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> SlotStatus {
        self.status
    }

    /// Vehicle class this slot accepts.
    #[must_use]
    pub fn vehicle_type(&self) -> VehicleType {
        self.vehicle_type
    }

    /// Hourly price charged for this slot.
    #[must_use]
    pub fn hourly_price(&self) -> &Money<'static, Currency> {
        &self.hourly_price
    }

    /// User currently holding the slot, if booked.
    #[must_use]
    pub fn booked_by(&self) -> Option<&str> {
        self.booked_by.as_deref()
    }

    /// End of the booking currently holding the slot, if booked.
    #[must_use]
    pub fn booked_until(&self) -> Option<Timestamp> {
        self.booked_until
    }

    pub(crate) fn set_status(&mut self, status: SlotStatus) {
        self.status = status;
    }

    pub(crate) fn set_hourly_price(&mut self, price: Money<'static, Currency>) {
        self.hourly_price = price;
    }

    pub(crate) fn mark_booked(&mut self, user_id: impl Into<String>, until: Timestamp) {
        self.status = SlotStatus::Booked;
        self.booked_by = Some(user_id.into());
        self.booked_until = Some(until);
    }

    pub(crate) fn release(&mut self) {
        self.status = SlotStatus::Available;
        self.booked_by = None;
        self.booked_until = None;
    }
}
