//! Fixtures

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::Money;
use thiserror::Error;

use crate::{
    bookings::{Booking, BookingKey, BookingRequest},
    fixtures::{bookings::BookingsFixture, locations::LocationsFixture},
    ledger::{LedgerError, ParkingLedger},
    locations::{LocationKey, NewLocation},
};

pub mod bookings;
pub mod locations;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Location not found
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// Booking not found
    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    /// Location fixture has no price rules to read a currency from
    #[error("Location {0} has no price rules")]
    MissingPriceRules(String),

    /// Slot number not present in the referenced location
    #[error("Slot {number} not found in location: {location}")]
    SlotNotFound {
        /// Location fixture key
        location: String,

        /// Slot number requested
        number: u32,
    },

    /// Currency mismatch between fixture prices
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No locations loaded yet
    #[error("No locations loaded yet; ledger is empty")]
    NoLedger,

    /// Ledger seeding error
    #[error("Failed to seed ledger: {0}")]
    Ledger(#[from] LedgerError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Ledger seeded from the fixture files
    ledger: Option<ParkingLedger>,

    /// String key -> `SlotMap` key mappings for lookups
    location_keys: FxHashMap<String, LocationKey>,
    booking_keys: FxHashMap<String, BookingKey>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            ledger: None,
            location_keys: FxHashMap::default(),
            booking_keys: FxHashMap::default(),
        }
    }

    /// Load locations from a YAML fixture file
    ///
    /// The first location loaded fixes the ledger currency; later files
    /// must price their rules in the same currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are
    /// currency mismatches.
    pub fn load_locations(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("locations").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: LocationsFixture = serde_norway::from_str(&contents)?;

        for (key, location_fixture) in fixture.locations {
            // Parse to get currency first (before creating the location)
            let rule = location_fixture
                .price_rules
                .first()
                .ok_or_else(|| FixtureError::MissingPriceRules(key.clone()))?;
            let (_minor_units, currency) = locations::parse_price(&rule.hourly_rate)?;

            let ledger = match self.ledger.as_mut() {
                Some(ledger) => {
                    if ledger.currency() != currency {
                        return Err(FixtureError::CurrencyMismatch(
                            ledger.currency().iso_alpha_code.to_string(),
                            currency.iso_alpha_code.to_string(),
                        ));
                    }

                    ledger
                }
                None => self.ledger.insert(ParkingLedger::new(currency)),
            };

            let created_at = location_fixture.created_at;
            let new_location: NewLocation = location_fixture.try_into()?;
            let location_key = ledger.create_location(new_location, created_at)?;

            self.location_keys.insert(key, location_key);
        }

        Ok(self)
    }

    /// Load bookings from a YAML fixture file
    ///
    /// Bookings reference locations by fixture key and slots by number, so
    /// the locations they target must already be loaded. Seeded bookings
    /// keep the stored status from the file; an active one marks its slot
    /// as booked.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if a booking
    /// references a location or slot that does not exist.
    pub fn load_bookings(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("bookings").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: BookingsFixture = serde_norway::from_str(&contents)?;

        for (key, booking_fixture) in fixture.bookings {
            let location_key = self
                .location_keys
                .get(&booking_fixture.location)
                .copied()
                .ok_or_else(|| FixtureError::LocationNotFound(booking_fixture.location.clone()))?;

            let (minor_units, currency) = locations::parse_price(&booking_fixture.total_amount)?;

            let ledger = self.ledger.as_mut().ok_or(FixtureError::NoLedger)?;

            if ledger.currency() != currency {
                return Err(FixtureError::CurrencyMismatch(
                    ledger.currency().iso_alpha_code.to_string(),
                    currency.iso_alpha_code.to_string(),
                ));
            }

            let (slot_key, slot_number, vehicle_type) = ledger
                .slots_for_location(location_key)?
                .into_iter()
                .find(|(_, slot)| slot.number() == booking_fixture.slot_number)
                .map(|(slot_key, slot)| (slot_key, slot.number(), slot.vehicle_type()))
                .ok_or_else(|| FixtureError::SlotNotFound {
                    location: booking_fixture.location.clone(),
                    number: booking_fixture.slot_number,
                })?;

            let location_name = ledger.location(location_key)?.profile().name.clone();

            let mut booking = Booking::new(
                BookingRequest {
                    user_id: booking_fixture.user_id,
                    location: location_key,
                    slot: slot_key,
                    starts: booking_fixture.starts,
                    ends: booking_fixture.ends,
                    vehicle_number: booking_fixture.vehicle_number,
                },
                location_name,
                slot_number,
                vehicle_type,
                Money::from_minor(minor_units, currency),
                booking_fixture.payment_status,
            );

            booking.set_status(booking_fixture.status);

            let booking_key = ledger.seed_booking(booking)?;

            self.booking_keys.insert(key, booking_key);
        }

        Ok(self)
    }

    /// Load a complete fixture set (locations and bookings with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_locations(name)?.load_bookings(name)?;

        Ok(fixture)
    }

    /// Get a location key by its fixture key
    ///
    /// # Errors
    ///
    /// Returns an error if the location is not found.
    pub fn location_key(&self, key: &str) -> Result<LocationKey, FixtureError> {
        self.location_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::LocationNotFound(key.to_string()))
    }

    /// Get a booking key by its fixture key
    ///
    /// # Errors
    ///
    /// Returns an error if the booking is not found.
    pub fn booking_key(&self, key: &str) -> Result<BookingKey, FixtureError> {
        self.booking_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::BookingNotFound(key.to_string()))
    }

    /// Get the seeded ledger
    ///
    /// # Errors
    ///
    /// Returns an error if no locations have been loaded yet.
    pub fn ledger(&self) -> Result<&ParkingLedger, FixtureError> {
        self.ledger.as_ref().ok_or(FixtureError::NoLedger)
    }

    /// Consume the fixture, returning the seeded ledger
    ///
    /// # Errors
    ///
    /// Returns an error if no locations have been loaded yet.
    pub fn into_ledger(self) -> Result<ParkingLedger, FixtureError> {
        self.ledger.ok_or(FixtureError::NoLedger)
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no locations have been loaded yet.
    pub fn currency(&self) -> Result<&'static rusty_money::iso::Currency, FixtureError> {
        Ok(self.ledger()?.currency())
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use rusty_money::iso::USD;
    use tempfile::tempdir;
    use testresult::TestResult;

    use super::*;
    use crate::slots::SlotStatus;

    const MICRO_LOT_USD: &str = r#"
locations:
  micro-lot:
    name: Micro Lot
    description: Tiny test lot
    parking-type: outdoor
    contact:
      phone: "+1 (555) 000-0001"
      email: micro@example.com
    address:
      line: 1 Test Street
      city: Testville
      state: TS
      zip-code: "00001"
      country: USA
    position:
      latitude: 40.0
      longitude: -74.0
    features: []
    hours:
      default-open: "06:00:00"
      default-close: "22:00:00"
    price-rules:
      - name: Car - Flat
        vehicle-type: car
        band: off-peak
        starts: "00:00:00"
        ends: "23:00:00"
        hourly-rate: 1.00 USD
        daily-rate: 8.00 USD
    is-active: true
    total-slots: 5
    created-at: 2024-01-01T00:00:00Z
"#;

    fn write_fixture(base: &Path, category: &str, name: &str, contents: &str) -> TestResult {
        let dir = base.join(category);

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    #[test]
    fn fixture_loads_locations_and_bookings() -> TestResult {
        let mut fixture = Fixture::new();

        fixture.load_locations("demo")?.load_bookings("demo")?;

        // Check locations were loaded
        assert_eq!(fixture.location_keys.len(), 2);

        let downtown = fixture.location_key("downtown-plaza")?;
        let ledger = fixture.ledger()?;
        let location = ledger.location(downtown)?;

        assert_eq!(location.profile().name, "Downtown Parking Plaza");
        assert_eq!(location.total_slots(), 50);

        // 45 bookable slots, one held by the seeded active booking
        assert_eq!(location.available_slots(), 44);

        // Check bookings were loaded
        assert_eq!(fixture.booking_keys.len(), 2);

        // Check currency was set
        assert_eq!(fixture.currency()?, USD);

        Ok(())
    }

    #[test]
    fn fixture_from_set_loads_all_fixtures() -> TestResult {
        let fixture = Fixture::from_set("demo")?;

        assert_eq!(fixture.location_keys.len(), 2);
        assert_eq!(fixture.booking_keys.len(), 2);

        Ok(())
    }

    #[test]
    fn fixture_seeded_active_booking_marks_its_slot() -> TestResult {
        let fixture = Fixture::from_set("demo")?;

        let downtown = fixture.location_key("downtown-plaza")?;
        let ledger = fixture.ledger()?;
        let slots = ledger.slots_for_location(downtown)?;

        let (_, first) = slots
            .iter()
            .find(|(_, slot)| slot.number() == 1)
            .expect("slot 1 exists");

        assert_eq!(first.status(), SlotStatus::Booked);
        assert_eq!(first.booked_by(), Some("2"));

        // The completed booking's slot stays free
        let (_, fifteenth) = slots
            .iter()
            .find(|(_, slot)| slot.number() == 15)
            .expect("slot 15 exists");

        assert_eq!(fifteenth.status(), SlotStatus::Available);

        Ok(())
    }

    #[test]
    fn fixture_booking_keys_resolve_to_seeded_bookings() -> TestResult {
        let fixture = Fixture::from_set("demo")?;

        let key = fixture.booking_key("booking-1")?;
        let booking = fixture.ledger()?.booking(key)?;

        assert_eq!(booking.user_id(), "2");
        assert_eq!(booking.slot_number(), 1);
        assert_eq!(booking.total_amount(), &Money::from_minor(2000, USD));

        Ok(())
    }

    #[test]
    fn fixture_location_not_found_returns_error() {
        let fixture = Fixture::new();
        let result = fixture.location_key("nonexistent");

        assert!(matches!(result, Err(FixtureError::LocationNotFound(_))));
    }

    #[test]
    fn fixture_booking_not_found_returns_error() {
        let fixture = Fixture::new();
        let result = fixture.booking_key("nonexistent");

        assert!(matches!(result, Err(FixtureError::BookingNotFound(_))));
    }

    #[test]
    fn fixture_no_ledger_returns_error() {
        let fixture = Fixture::new();
        let result = fixture.ledger();

        assert!(matches!(result, Err(FixtureError::NoLedger)));
    }

    #[test]
    fn fixture_bookings_before_locations_returns_error() {
        let mut fixture = Fixture::new();
        let result = fixture.load_bookings("demo");

        assert!(matches!(result, Err(FixtureError::LocationNotFound(_))));
    }

    #[test]
    fn fixture_load_locations_rejects_currency_mismatch() -> TestResult {
        let dir = tempdir()?;
        let gbp_lot = MICRO_LOT_USD
            .replace("USD", "GBP")
            .replace("micro-lot", "micro-lot-gbp");

        write_fixture(dir.path(), "locations", "usd_set", MICRO_LOT_USD)?;
        write_fixture(dir.path(), "locations", "gbp_set", &gbp_lot)?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_locations("usd_set")?;

        let result = fixture.load_locations("gbp_set");

        assert!(matches!(result, Err(FixtureError::CurrencyMismatch(_, _))));

        Ok(())
    }

    #[test]
    fn fixture_location_without_price_rules_is_reported_by_name() -> TestResult {
        let dir = tempdir()?;
        let bare_lot = r#"
locations:
  bare-lot:
    name: Bare Lot
    description: Lot with no pricing yet
    parking-type: outdoor
    contact:
      phone: "+1 (555) 000-0002"
      email: bare@example.com
    address:
      line: 2 Test Street
      city: Testville
      state: TS
      zip-code: "00002"
      country: USA
    position:
      latitude: 40.0
      longitude: -74.0
    features: []
    hours:
      default-open: "06:00:00"
      default-close: "22:00:00"
    price-rules: []
    is-active: true
    total-slots: 5
    created-at: 2024-01-01T00:00:00Z
"#;

        write_fixture(dir.path(), "locations", "bare", bare_lot)?;

        let mut fixture = Fixture::with_base_path(dir.path());
        let result = fixture.load_locations("bare");

        assert!(matches!(
            result,
            Err(FixtureError::MissingPriceRules(key)) if key == "bare-lot"
        ));

        Ok(())
    }

    #[test]
    fn fixture_load_bookings_rejects_unknown_slot_number() -> TestResult {
        let dir = tempdir()?;

        write_fixture(dir.path(), "locations", "micro", MICRO_LOT_USD)?;
        write_fixture(
            dir.path(),
            "bookings",
            "micro",
            r#"
bookings:
  overflow:
    user-id: "7"
    location: micro-lot
    slot-number: 99
    starts: 2024-03-01T10:00:00Z
    ends: 2024-03-01T12:00:00Z
    total-amount: 2.00 USD
    status: active
    payment-status: paid
"#,
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_locations("micro")?;

        let result = fixture.load_bookings("micro");

        assert!(matches!(
            result,
            Err(FixtureError::SlotNotFound { number: 99, .. })
        ));

        Ok(())
    }

    #[test]
    fn fixture_default_matches_new() {
        let fixture = Fixture::default();

        assert_eq!(fixture.base_path, PathBuf::from("./fixtures"));
        assert!(fixture.ledger.is_none());
        assert!(fixture.location_keys.is_empty());
    }
}
