//! Parking locations
//!
//! A [`ParkingLocation`] owns an ordered run of slots (numbered `1..=N`)
//! plus the dealer-editable [`LocationProfile`]: contact details, address,
//! operating hours, feature set and price rules. The derived available
//! count is maintained exclusively by the ledger's recount; nothing in
//! this module assigns it directly.

use jiff::{Timestamp, civil::Time};
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::slots::{SlotKey, VehicleType};

new_key_type! {
    /// Parking Location Key
    pub struct LocationKey;
}

/// Largest slot count a single location may be created with.
pub const MAX_LOCATION_SLOTS: u32 = 1000;

/// Physical layout of a parking location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParkingType {
    /// Open-air surface lot.
    Outdoor,

    /// Enclosed single-level facility.
    Indoor,

    /// Stacked multi-storey facility.
    MultiLevel,

    /// On-street bays.
    Street,

    /// Private garage.
    Garage,
}

/// Amenity advertised by a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    /// Covered / sheltered parking.
    CoveredParking,

    /// EV charging points.
    EvCharging,

    /// CCTV surveillance.
    Surveillance,

    /// Covered car bays.
    CoveredCar,

    /// Covered bays with EV charging.
    CoveredEv,

    /// Covered truck bays.
    CoveredTruck,

    /// Truck bays with EV charging.
    EvTruck,

    /// On-site security staff.
    Security,

    /// Public restroom.
    Restroom,

    /// Wheelchair accessible.
    Wheelchair,
}

/// Time band a price rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RateBand {
    /// Peak hours.
    Peak,

    /// Off-peak hours.
    OffPeak,

    /// Overnight.
    Night,
}

/// Day of the week for operating-hours schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Weekday {
    /// Monday.
    Monday,

    /// Tuesday.
    Tuesday,

    /// Wednesday.
    Wednesday,

    /// Thursday.
    Thursday,

    /// Friday.
    Friday,

    /// Saturday.
    Saturday,

    /// Sunday.
    Sunday,
}

impl Weekday {
    /// All seven days, Monday first.
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];
}

/// Latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub latitude: f64,

    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// Postal address of a location.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StreetAddress {
    /// Street line, e.g. `123 Main Street`.
    pub line: String,

    /// City.
    pub city: String,

    /// State or region.
    pub state: String,

    /// Postal / ZIP code.
    pub zip_code: String,

    /// Country.
    pub country: String,
}

/// Contact channels for a location.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ContactInfo {
    /// Primary phone number.
    pub phone: String,

    /// Secondary phone number.
    pub alternate_phone: Option<String>,

    /// Contact email address.
    pub email: String,
}

/// Opening times for one day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WeekdaySchedule {
    /// Which day this entry covers.
    pub day: Weekday,

    /// Whether the location opens at all on this day.
    pub is_open: bool,

    /// Opening time.
    pub opens: Time,

    /// Closing time.
    pub closes: Time,
}

/// Weekly operating hours: a default open/close pair plus one schedule
/// entry per weekday.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatingHours {
    /// Default opening time applied when building daily schedules.
    pub default_open: Time,

    /// Default closing time applied when building daily schedules.
    pub default_close: Time,

    /// Per-day schedule, Monday first.
    pub weekdays: SmallVec<[WeekdaySchedule; 7]>,
}

impl OperatingHours {
    /// Builds a schedule that opens every day at `open` and closes at `close`.
    pub fn daily(open: Time, close: Time) -> Self {
        let weekdays = Weekday::ALL
            .iter()
            .map(|day| WeekdaySchedule {
                day: *day,
                is_open: true,
                opens: open,
                closes: close,
            })
            .collect();

        Self {
            default_open: open,
            default_close: close,
            weekdays,
        }
    }

    /// Returns the schedule entry for the given day, if one exists.
    #[must_use]
    pub fn for_day(&self, day: Weekday) -> Option<&WeekdaySchedule> {
        self.weekdays.iter().find(|schedule| schedule.day == day)
    }
}

/// A pricing rule used to seed slot prices at location creation.
///
/// Rules are ordered; the first rule's hourly rate prices every slot when
/// the location is created. No automatic re-evaluation against the current
/// time happens afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRule {
    /// Display name, e.g. `Car - Peak Hours`.
    pub name: String,

    /// Vehicle class the rule covers.
    pub vehicle_type: VehicleType,

    /// Time band the rule covers.
    pub band: RateBand,

    /// Start of the band.
    pub starts: Time,

    /// End of the band.
    pub ends: Time,

    /// Hourly rate.
    pub hourly_rate: Money<'static, Currency>,

    /// Daily rate.
    pub daily_rate: Money<'static, Currency>,

    /// Weekly rate, if offered.
    pub weekly_rate: Option<Money<'static, Currency>>,

    /// Monthly rate, if offered.
    pub monthly_rate: Option<Money<'static, Currency>>,
}

/// The dealer-editable part of a location.
///
/// Updates replace this wholesale; capacity and slots are never touched by
/// a profile update.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationProfile {
    /// Display name.
    pub name: String,

    /// Free-text description.
    pub description: String,

    /// Physical layout.
    pub parking_type: ParkingType,

    /// Contact channels.
    pub contact: ContactInfo,

    /// Postal address.
    pub address: StreetAddress,

    /// Geographic position.
    pub position: GeoPoint,

    /// Advertised amenities.
    pub features: SmallVec<[Feature; 4]>,

    /// Weekly operating hours.
    pub hours: OperatingHours,

    /// Ordered price rules; must be non-empty.
    pub price_rules: SmallVec<[PriceRule; 2]>,

    /// Whether the location is accepting bookings.
    pub is_active: bool,
}

/// Input for creating a location: the profile plus the slot capacity to
/// generate.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    /// Descriptive profile.
    pub profile: LocationProfile,

    /// Number of slots to generate, `1..=MAX_LOCATION_SLOTS`.
    pub total_slots: u32,
}

/// A parking location and its slot run.
#[derive(Debug, Clone)]
pub struct ParkingLocation {
    profile: LocationProfile,
    total_slots: u32,
    max_bookable_slots: u32,
    available_slots: u32,
    slot_keys: Vec<SlotKey>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl ParkingLocation {
    pub(crate) fn new(
        profile: LocationProfile,
        total_slots: u32,
        max_bookable_slots: u32,
        slot_keys: Vec<SlotKey>,
        now: Timestamp,
    ) -> Self {
        Self {
            profile,
            total_slots,
            max_bookable_slots,
            available_slots: max_bookable_slots,
            slot_keys,
            created_at: now,
            updated_at: now,
        }
    }

    /// Descriptive profile of the location.
    #[must_use]
    pub fn profile(&self) -> &LocationProfile {
        &self.profile
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.profile.name
    }

    /// Total number of slots generated for this location.
    #[must_use]
    pub fn total_slots(&self) -> u32 {
        self.total_slots
    }

    /// Upper bound of slots open to customers, 90% of the total.
    #[must_use]
    pub fn max_bookable_slots(&self) -> u32 {
        self.max_bookable_slots
    }

    /// Count of slots currently available; recomputed after every slot
    /// mutation, never assigned independently.
    #[must_use]
    pub fn available_slots(&self) -> u32 {
        self.available_slots
    }

    /// Keys of the location's slots in slot-number order.
    #[must_use]
    pub fn slot_keys(&self) -> &[SlotKey] {
        &self.slot_keys
    }

    /// When the location was created.
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// When the location profile or slots last changed.
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub(crate) fn set_available_slots(&mut self, count: u32) {
        self.available_slots = count;
    }

    pub(crate) fn replace_profile(&mut self, profile: LocationProfile, now: Timestamp) {
        self.profile = profile;
        self.updated_at = now;
    }
}
