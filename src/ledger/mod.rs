//! Booking/slot ledger
//!
//! [`ParkingLedger`] is the single in-memory store: parking locations,
//! the slots they own, and a flat collection of bookings, all in one
//! currency. Every mutation is synchronous and atomic with respect to
//! the store; the only asynchronous work (payment, geocoding) happens in
//! the service layer before or after a ledger call.
//!
//! Each location's available count is derived state. It is recomputed by
//! [`ParkingLedger::recount_available`] after every slot mutation and is
//! never assigned anywhere else.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use slotmap::SlotMap;

use crate::{
    billing,
    bookings::{Booking, BookingKey, BookingRequest, BookingStatus, PaymentStatus},
    locations::{
        LocationKey, LocationProfile, MAX_LOCATION_SLOTS, NewLocation, ParkingLocation,
    },
    slots::{ParkingSlot, SlotKey, SlotStatus, VehicleType},
};

pub mod error;

pub use error::{LedgerError, ValidationError};

/// Bookings may only be cancelled while more than this much time remains
/// before their start.
const CANCELLATION_WINDOW_MS: i64 = 3_600_000;

/// The booking/slot ledger.
#[derive(Debug)]
pub struct ParkingLedger {
    currency: &'static Currency,
    locations: SlotMap<LocationKey, ParkingLocation>,
    slots: SlotMap<SlotKey, ParkingSlot>,
    bookings: SlotMap<BookingKey, Booking>,
}

impl ParkingLedger {
    /// Creates an empty ledger operating in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            currency,
            locations: SlotMap::with_key(),
            slots: SlotMap::with_key(),
            bookings: SlotMap::with_key(),
        }
    }

    /// Currency every amount in this ledger is denominated in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Creates a location and generates its slot run.
    ///
    /// Slots are numbered `1..=total_slots`; the first 90% (rounded
    /// down) start available, the remainder disabled. Every slot's price
    /// is seeded from the first price rule's hourly rate.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::SlotCountOutOfRange`]: `total_slots` is not
    ///   within `1..=MAX_LOCATION_SLOTS`.
    /// - [`ValidationError::MissingField`] /
    ///   [`ValidationError::NoPriceRules`]: required profile fields are
    ///   missing.
    /// - [`ValidationError::NegativePrice`]: a rule rate is below zero.
    /// - [`ValidationError::CurrencyMismatch`]: a rule rate is not in the
    ///   ledger currency.
    pub fn create_location(
        &mut self,
        new: NewLocation,
        now: Timestamp,
    ) -> Result<LocationKey, LedgerError> {
        let NewLocation {
            profile,
            total_slots,
        } = new;

        if total_slots == 0 || total_slots > MAX_LOCATION_SLOTS {
            return Err(ValidationError::SlotCountOutOfRange(total_slots).into());
        }

        validate_profile(&profile)?;
        self.validate_rule_currencies(&profile)?;

        let seed_price = profile
            .price_rules
            .first()
            .ok_or(ValidationError::NoPriceRules)?
            .hourly_rate
            .clone();

        let max_bookable = max_bookable_slots(total_slots);

        let mut slot_keys = Vec::with_capacity(total_slots as usize);

        for number in 1..=total_slots {
            let mut slot = ParkingSlot::new(number, VehicleType::Car, seed_price);

            if number > max_bookable {
                slot.set_status(SlotStatus::Disabled);
            }

            slot_keys.push(self.slots.insert(slot));
        }

        let location = ParkingLocation::new(profile, total_slots, max_bookable, slot_keys, now);

        Ok(self.locations.insert(location))
    }

    /// Replaces a location's descriptive profile wholesale.
    ///
    /// Capacity and slots are untouched; only the profile and the
    /// `updated_at` timestamp change.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed profile, or
    /// [`LedgerError::LocationNotFound`] for an unknown key.
    pub fn update_location(
        &mut self,
        key: LocationKey,
        profile: LocationProfile,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        validate_profile(&profile)?;
        self.validate_rule_currencies(&profile)?;

        let location = self
            .locations
            .get_mut(key)
            .ok_or(LedgerError::LocationNotFound(key))?;

        location.replace_profile(profile, now);

        Ok(())
    }

    /// Removes a location and all slots it owns.
    ///
    /// Bookings that reference the location are kept as history; they
    /// carry their own copies of the location name and slot number.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::LocationNotFound`] for an unknown key.
    pub fn remove_location(&mut self, key: LocationKey) -> Result<ParkingLocation, LedgerError> {
        let location = self
            .locations
            .remove(key)
            .ok_or(LedgerError::LocationNotFound(key))?;

        for slot_key in location.slot_keys() {
            self.slots.remove(*slot_key);
        }

        Ok(location)
    }

    /// Flips a slot between disabled and available, returning the new
    /// status.
    ///
    /// Booked slots are not toggled; they must be released first.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::LocationNotFound`] / [`LedgerError::SlotNotFound`]:
    ///   unknown keys, or the slot is not in the addressed location.
    /// - [`LedgerError::SlotBooked`]: the slot is currently booked.
    pub fn toggle_slot(
        &mut self,
        location: LocationKey,
        slot: SlotKey,
    ) -> Result<SlotStatus, LedgerError> {
        self.ensure_slot_in_location(location, slot)?;

        let parking_slot = self
            .slots
            .get_mut(slot)
            .ok_or(LedgerError::SlotNotFound(slot))?;

        let next = match parking_slot.status() {
            SlotStatus::Available => SlotStatus::Disabled,
            SlotStatus::Disabled => SlotStatus::Available,
            SlotStatus::Booked => return Err(LedgerError::SlotBooked(parking_slot.number())),
        };

        parking_slot.set_status(next);
        self.recount_available(location)?;

        Ok(next)
    }

    /// Updates a single slot's hourly price.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::NegativePrice`]: the price is below zero.
    /// - [`ValidationError::CurrencyMismatch`]: the price is not in the
    ///   ledger currency.
    /// - [`LedgerError::LocationNotFound`] / [`LedgerError::SlotNotFound`]:
    ///   unknown keys, or the slot is not in the addressed location.
    pub fn set_slot_price(
        &mut self,
        location: LocationKey,
        slot: SlotKey,
        price: Money<'static, Currency>,
    ) -> Result<(), LedgerError> {
        ensure_non_negative(&price)?;
        self.ensure_ledger_currency(&price)?;
        self.ensure_slot_in_location(location, slot)?;

        let parking_slot = self
            .slots
            .get_mut(slot)
            .ok_or(LedgerError::SlotNotFound(slot))?;

        parking_slot.set_hourly_price(price);

        Ok(())
    }

    /// Prices a booking window against a slot without booking it.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::EmptyWindow`]: `ends` is not after `starts`.
    /// - [`LedgerError::LocationNotFound`] / [`LedgerError::SlotNotFound`]:
    ///   unknown keys, or the slot is not in the addressed location.
    pub fn quote(
        &self,
        location: LocationKey,
        slot: SlotKey,
        starts: Timestamp,
        ends: Timestamp,
    ) -> Result<Money<'static, Currency>, LedgerError> {
        if ends <= starts {
            return Err(ValidationError::EmptyWindow.into());
        }

        self.ensure_slot_in_location(location, slot)?;

        let parking_slot = self
            .slots
            .get(slot)
            .ok_or(LedgerError::SlotNotFound(slot))?;

        Ok(billing::window_total(
            starts,
            ends,
            parking_slot.hourly_price(),
        )?)
    }

    /// Validates a booking request without recording anything: window
    /// shape, slot membership and availability.
    ///
    /// Callers that charge a payment before recording can use this to
    /// reject doomed requests before money moves.
    ///
    /// # Errors
    ///
    /// Same failures as [`ParkingLedger::create_booking`], minus the
    /// billing step.
    pub fn check_bookable(
        &self,
        request: &BookingRequest,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        if request.ends <= request.starts {
            return Err(ValidationError::EmptyWindow.into());
        }

        if request.starts < now {
            return Err(ValidationError::StartInPast.into());
        }

        self.ensure_slot_in_location(request.location, request.slot)?;

        let parking_slot = self
            .slots
            .get(request.slot)
            .ok_or(LedgerError::SlotNotFound(request.slot))?;

        if parking_slot.status() != SlotStatus::Available {
            return Err(LedgerError::SlotUnavailable {
                number: parking_slot.number(),
                status: parking_slot.status(),
            });
        }

        Ok(())
    }

    /// Books an available slot for a time window.
    ///
    /// The charge is the ceiling hour count times the slot's hourly
    /// rate. On success the slot is marked booked with the holder and
    /// end time, and the location's available count drops by one. The
    /// payment outcome is supplied by the caller; running the payment is
    /// the desk's job, not the ledger's.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::EmptyWindow`] /
    ///   [`ValidationError::StartInPast`]: the window is malformed.
    /// - [`LedgerError::LocationNotFound`] / [`LedgerError::SlotNotFound`]:
    ///   unknown keys, or the slot is not in the addressed location.
    /// - [`LedgerError::SlotUnavailable`]: the slot is booked or
    ///   disabled.
    pub fn create_booking(
        &mut self,
        request: BookingRequest,
        payment_status: PaymentStatus,
        now: Timestamp,
    ) -> Result<BookingKey, LedgerError> {
        self.check_bookable(&request, now)?;

        let location_name = self
            .locations
            .get(request.location)
            .ok_or(LedgerError::LocationNotFound(request.location))?
            .name()
            .to_owned();

        let parking_slot = self
            .slots
            .get_mut(request.slot)
            .ok_or(LedgerError::SlotNotFound(request.slot))?;

        let slot_number = parking_slot.number();
        let vehicle_type = parking_slot.vehicle_type();
        let total = billing::window_total(request.starts, request.ends, parking_slot.hourly_price())?;

        parking_slot.mark_booked(request.user_id.clone(), request.ends);

        let location_key = request.location;
        let booking = Booking::new(
            request,
            location_name,
            slot_number,
            vehicle_type,
            total,
            payment_status,
        );

        let booking_key = self.bookings.insert(booking);

        self.recount_available(location_key)?;

        Ok(booking_key)
    }

    /// Cancels an active booking on behalf of its owner.
    ///
    /// Only the booking's own user may cancel it; anyone else is told
    /// the booking does not exist. Cancellation is allowed only while
    /// more than one hour remains before the booking starts. The slot
    /// is deliberately not freed here; [`ParkingLedger::release_slot`]
    /// is the explicit transition back to available.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::BookingNotFound`]: unknown key, or the acting
    ///   user does not own the booking.
    /// - [`LedgerError::BookingNotActive`]: the booking already reads as
    ///   completed or cancelled at `now`.
    /// - [`LedgerError::CancellationWindowClosed`]: less than one hour
    ///   remains before the start.
    pub fn cancel_booking(
        &mut self,
        key: BookingKey,
        acting_user: &str,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        let booking = self
            .bookings
            .get_mut(key)
            .ok_or(LedgerError::BookingNotFound(key))?;

        if booking.user_id() != acting_user {
            return Err(LedgerError::BookingNotFound(key));
        }

        let status = booking.status_at(now);

        if status != BookingStatus::Active {
            return Err(LedgerError::BookingNotActive(status));
        }

        if booking.starts().as_millisecond() - now.as_millisecond() <= CANCELLATION_WINDOW_MS {
            return Err(LedgerError::CancellationWindowClosed);
        }

        booking.set_status(BookingStatus::Cancelled);

        Ok(())
    }

    /// Returns a booked slot to available, clearing its holder.
    ///
    /// This is the explicit booked-to-available transition; cancelling
    /// or completing a booking never frees its slot implicitly.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::LocationNotFound`] / [`LedgerError::SlotNotFound`]:
    ///   unknown keys, or the slot is not in the addressed location.
    /// - [`LedgerError::SlotNotBooked`]: the slot is not currently
    ///   booked.
    pub fn release_slot(
        &mut self,
        location: LocationKey,
        slot: SlotKey,
    ) -> Result<(), LedgerError> {
        self.ensure_slot_in_location(location, slot)?;

        let parking_slot = self
            .slots
            .get_mut(slot)
            .ok_or(LedgerError::SlotNotFound(slot))?;

        if parking_slot.status() != SlotStatus::Booked {
            return Err(LedgerError::SlotNotBooked(parking_slot.number()));
        }

        parking_slot.release();
        self.recount_available(location)?;

        Ok(())
    }

    /// Looks up a location by key.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::LocationNotFound`] for an unknown key.
    pub fn location(&self, key: LocationKey) -> Result<&ParkingLocation, LedgerError> {
        self.locations
            .get(key)
            .ok_or(LedgerError::LocationNotFound(key))
    }

    /// Iterates over all locations.
    pub fn locations(&self) -> impl Iterator<Item = (LocationKey, &ParkingLocation)> {
        self.locations.iter()
    }

    /// Looks up a slot within a location.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::LocationNotFound`] or
    /// [`LedgerError::SlotNotFound`] if either key is unknown or the
    /// slot is not in the addressed location.
    pub fn slot(&self, location: LocationKey, slot: SlotKey) -> Result<&ParkingSlot, LedgerError> {
        self.ensure_slot_in_location(location, slot)?;

        self.slots.get(slot).ok_or(LedgerError::SlotNotFound(slot))
    }

    /// Returns a location's slots in slot-number order.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::LocationNotFound`] for an unknown key.
    pub fn slots_for_location(
        &self,
        key: LocationKey,
    ) -> Result<Vec<(SlotKey, &ParkingSlot)>, LedgerError> {
        let location = self.location(key)?;

        Ok(location
            .slot_keys()
            .iter()
            .filter_map(|slot_key| self.slots.get(*slot_key).map(|slot| (*slot_key, slot)))
            .collect())
    }

    /// Looks up a booking by key.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::BookingNotFound`] for an unknown key.
    pub fn booking(&self, key: BookingKey) -> Result<&Booking, LedgerError> {
        self.bookings
            .get(key)
            .ok_or(LedgerError::BookingNotFound(key))
    }

    /// Iterates over all bookings.
    pub fn bookings(&self) -> impl Iterator<Item = (BookingKey, &Booking)> {
        self.bookings.iter()
    }

    /// Returns all bookings made by the given user.
    #[must_use]
    pub fn bookings_for_user(&self, user_id: &str) -> Vec<(BookingKey, &Booking)> {
        self.bookings
            .iter()
            .filter(|(_, booking)| booking.user_id() == user_id)
            .collect()
    }

    /// Returns all bookings whose effective status at `now` matches.
    #[must_use]
    pub fn bookings_with_status(
        &self,
        status: BookingStatus,
        now: Timestamp,
    ) -> Vec<(BookingKey, &Booking)> {
        self.bookings
            .iter()
            .filter(|(_, booking)| booking.status_at(now) == status)
            .collect()
    }

    /// Inserts a pre-built booking, bypassing window preconditions.
    ///
    /// Fixture seeding uses this to reproduce historical bookings. A
    /// stored-active booking still marks its slot booked and triggers a
    /// recount, keeping the availability invariant intact.
    pub(crate) fn seed_booking(&mut self, booking: Booking) -> Result<BookingKey, LedgerError> {
        self.ensure_slot_in_location(booking.location(), booking.slot())?;

        let location_key = booking.location();
        let slot_key = booking.slot();
        let holder = booking.user_id().to_owned();
        let until = booking.ends();
        let is_active = booking.stored_status() == BookingStatus::Active;

        let key = self.bookings.insert(booking);

        if is_active {
            if let Some(slot) = self.slots.get_mut(slot_key) {
                slot.mark_booked(holder, until);
            }

            self.recount_available(location_key)?;
        }

        Ok(key)
    }

    /// Recomputes a location's available count from its slots.
    ///
    /// Every slot mutation funnels through here; the count is never
    /// assigned anywhere else.
    fn recount_available(&mut self, key: LocationKey) -> Result<(), LedgerError> {
        let location = self
            .locations
            .get(key)
            .ok_or(LedgerError::LocationNotFound(key))?;

        let available = location
            .slot_keys()
            .iter()
            .filter(|slot_key| {
                self.slots.get(**slot_key).map(ParkingSlot::status) == Some(SlotStatus::Available)
            })
            .count();

        let count = u32::try_from(available).unwrap_or(u32::MAX);

        if let Some(location) = self.locations.get_mut(key) {
            location.set_available_slots(count);
        }

        Ok(())
    }

    fn ensure_slot_in_location(
        &self,
        location: LocationKey,
        slot: SlotKey,
    ) -> Result<(), LedgerError> {
        let parking_location = self
            .locations
            .get(location)
            .ok_or(LedgerError::LocationNotFound(location))?;

        if parking_location.slot_keys().contains(&slot) {
            Ok(())
        } else {
            Err(LedgerError::SlotNotFound(slot))
        }
    }

    fn ensure_ledger_currency(
        &self,
        amount: &Money<'static, Currency>,
    ) -> Result<(), ValidationError> {
        let currency = amount.currency();

        if currency == self.currency {
            Ok(())
        } else {
            Err(ValidationError::CurrencyMismatch {
                expected: self.currency.iso_alpha_code,
                actual: currency.iso_alpha_code,
            })
        }
    }

    fn validate_rule_currencies(&self, profile: &LocationProfile) -> Result<(), ValidationError> {
        for rule in &profile.price_rules {
            self.ensure_ledger_currency(&rule.hourly_rate)?;
            self.ensure_ledger_currency(&rule.daily_rate)?;

            if let Some(rate) = &rule.weekly_rate {
                self.ensure_ledger_currency(rate)?;
            }

            if let Some(rate) = &rule.monthly_rate {
                self.ensure_ledger_currency(rate)?;
            }
        }

        Ok(())
    }
}

/// Share of a location's slots open to customers: 90% of the total,
/// rounded down. The remainder is generated disabled as a buffer.
fn max_bookable_slots(total: u32) -> u32 {
    total * 9 / 10
}

fn validate_profile(profile: &LocationProfile) -> Result<(), ValidationError> {
    ensure_field("name", &profile.name)?;
    ensure_field("phone", &profile.contact.phone)?;
    ensure_field("email", &profile.contact.email)?;
    ensure_field("address line", &profile.address.line)?;
    ensure_field("city", &profile.address.city)?;

    if profile.price_rules.is_empty() {
        return Err(ValidationError::NoPriceRules);
    }

    for rule in &profile.price_rules {
        ensure_non_negative(&rule.hourly_rate)?;
        ensure_non_negative(&rule.daily_rate)?;

        if let Some(rate) = &rule.weekly_rate {
            ensure_non_negative(rate)?;
        }

        if let Some(rate) = &rule.monthly_rate {
            ensure_non_negative(rate)?;
        }
    }

    Ok(())
}

fn ensure_non_negative(amount: &Money<'static, Currency>) -> Result<(), ValidationError> {
    if amount.to_minor_units() < 0 {
        Err(ValidationError::NegativePrice)
    } else {
        Ok(())
    }
}

fn ensure_field(name: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(name))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use rusty_money::iso::{self, USD};
    use smallvec::smallvec;
    use testresult::TestResult;

    use super::*;
    use crate::locations::{
        ContactInfo, Feature, GeoPoint, OperatingHours, ParkingType, PriceRule, RateBand,
        StreetAddress,
    };

    fn test_profile() -> LocationProfile {
        LocationProfile {
            name: "Downtown Parking Plaza".to_owned(),
            description: "Multi-level parking in the business district".to_owned(),
            parking_type: ParkingType::MultiLevel,
            contact: ContactInfo {
                phone: "+1 (555) 123-4567".to_owned(),
                alternate_phone: None,
                email: "plaza@example.com".to_owned(),
            },
            address: StreetAddress {
                line: "123 Main Street".to_owned(),
                city: "New York".to_owned(),
                state: "NY".to_owned(),
                zip_code: "10001".to_owned(),
                country: "USA".to_owned(),
            },
            position: GeoPoint {
                latitude: 40.7128,
                longitude: -74.0060,
            },
            features: smallvec![Feature::CoveredParking, Feature::Surveillance],
            hours: OperatingHours::daily(
                jiff::civil::time(6, 0, 0, 0),
                jiff::civil::time(22, 0, 0, 0),
            ),
            price_rules: smallvec![PriceRule {
                name: "Car - Peak Hours".to_owned(),
                vehicle_type: VehicleType::Car,
                band: RateBand::Peak,
                starts: jiff::civil::time(8, 0, 0, 0),
                ends: jiff::civil::time(18, 0, 0, 0),
                hourly_rate: Money::from_minor(500, USD),
                daily_rate: Money::from_minor(4000, USD),
                weekly_rate: None,
                monthly_rate: None,
            }],
            is_active: true,
        }
    }

    fn test_ledger_with_location(total_slots: u32) -> Result<(ParkingLedger, LocationKey), LedgerError> {
        let mut ledger = ParkingLedger::new(USD);
        let key = ledger.create_location(
            NewLocation {
                profile: test_profile(),
                total_slots,
            },
            Timestamp::UNIX_EPOCH,
        )?;

        Ok((ledger, key))
    }

    #[test]
    fn create_location_generates_numbered_slot_run() -> TestResult {
        let (ledger, key) = test_ledger_with_location(50)?;
        let location = ledger.location(key)?;

        assert_eq!(location.total_slots(), 50);
        assert_eq!(location.max_bookable_slots(), 45);
        assert_eq!(location.available_slots(), 45);

        let slots = ledger.slots_for_location(key)?;
        let numbers: Vec<u32> = slots.iter().map(|(_, slot)| slot.number()).collect();

        assert_eq!(numbers, (1..=50).collect::<Vec<u32>>());

        for (_, slot) in &slots {
            let expected = if slot.number() <= 45 {
                SlotStatus::Available
            } else {
                SlotStatus::Disabled
            };

            assert_eq!(slot.status(), expected, "slot {}", slot.number());
            assert_eq!(*slot.hourly_price(), Money::from_minor(500, USD));
        }

        Ok(())
    }

    #[test]
    fn create_location_rejects_zero_and_oversized_slot_counts() {
        let mut ledger = ParkingLedger::new(USD);

        for total_slots in [0, MAX_LOCATION_SLOTS + 1] {
            let result = ledger.create_location(
                NewLocation {
                    profile: test_profile(),
                    total_slots,
                },
                Timestamp::UNIX_EPOCH,
            );

            assert!(
                matches!(
                    result,
                    Err(LedgerError::Validation(
                        ValidationError::SlotCountOutOfRange(_)
                    ))
                ),
                "expected SlotCountOutOfRange for {total_slots}"
            );
        }
    }

    #[test]
    fn create_location_rejects_blank_name() {
        let mut ledger = ParkingLedger::new(USD);
        let mut profile = test_profile();
        profile.name = "   ".to_owned();

        let result = ledger.create_location(
            NewLocation {
                profile,
                total_slots: 10,
            },
            Timestamp::UNIX_EPOCH,
        );

        match result {
            Err(LedgerError::Validation(ValidationError::MissingField(field))) => {
                assert_eq!(field, "name");
            }
            other => panic!("expected MissingField error, got {other:?}"),
        }
    }

    #[test]
    fn create_location_rejects_negative_rule_rates() {
        let mut ledger = ParkingLedger::new(USD);
        let mut profile = test_profile();

        if let Some(rule) = profile.price_rules.first_mut() {
            rule.hourly_rate = Money::from_minor(-500, USD);
        }

        let result = ledger.create_location(
            NewLocation {
                profile,
                total_slots: 10,
            },
            Timestamp::UNIX_EPOCH,
        );

        assert!(
            matches!(
                result,
                Err(LedgerError::Validation(ValidationError::NegativePrice))
            ),
            "a negative hourly rate must not seed slot prices"
        );
    }

    #[test]
    fn create_location_rejects_foreign_currency_rules() {
        let mut ledger = ParkingLedger::new(USD);
        let mut profile = test_profile();

        if let Some(rule) = profile.price_rules.first_mut() {
            rule.hourly_rate = Money::from_minor(500, iso::GBP);
        }

        let result = ledger.create_location(
            NewLocation {
                profile,
                total_slots: 10,
            },
            Timestamp::UNIX_EPOCH,
        );

        match result {
            Err(LedgerError::Validation(ValidationError::CurrencyMismatch {
                expected,
                actual,
            })) => {
                assert_eq!(expected, "USD");
                assert_eq!(actual, "GBP");
            }
            other => panic!("expected CurrencyMismatch error, got {other:?}"),
        }
    }

    #[test]
    fn max_bookable_is_ninety_percent_rounded_down() {
        assert_eq!(max_bookable_slots(50), 45);
        assert_eq!(max_bookable_slots(100), 90);
        assert_eq!(max_bookable_slots(99), 89);
        assert_eq!(max_bookable_slots(1), 0);
    }

    #[test]
    fn update_location_replaces_profile_but_keeps_slots() -> TestResult {
        let (mut ledger, key) = test_ledger_with_location(10)?;
        let later = Timestamp::UNIX_EPOCH + 2.hours();

        let mut profile = test_profile();
        profile.name = "Riverside Parking Deck".to_owned();
        profile.is_active = false;

        ledger.update_location(key, profile, later)?;

        let location = ledger.location(key)?;

        assert_eq!(location.name(), "Riverside Parking Deck");
        assert!(!location.profile().is_active);
        assert_eq!(location.updated_at(), later);
        assert_eq!(location.created_at(), Timestamp::UNIX_EPOCH);

        // Capacity and the slot run are untouched by a profile update.
        assert_eq!(location.total_slots(), 10);
        assert_eq!(location.max_bookable_slots(), 9);
        assert_eq!(location.available_slots(), 9);
        assert_eq!(ledger.slots_for_location(key)?.len(), 10);

        Ok(())
    }

    #[test]
    fn update_location_rejects_malformed_profiles_before_mutating() -> TestResult {
        let (mut ledger, key) = test_ledger_with_location(10)?;
        let mut profile = test_profile();
        profile.name = "   ".to_owned();

        let result = ledger.update_location(key, profile, Timestamp::UNIX_EPOCH + 1.hour());

        assert!(matches!(
            result,
            Err(LedgerError::Validation(ValidationError::MissingField(
                "name"
            )))
        ));

        let location = ledger.location(key)?;

        assert_eq!(location.name(), "Downtown Parking Plaza");
        assert_eq!(location.updated_at(), Timestamp::UNIX_EPOCH);

        Ok(())
    }

    #[test]
    fn update_location_misses_unknown_keys() {
        let mut ledger = ParkingLedger::new(USD);
        let mut other = ParkingLedger::new(USD);

        let foreign = other
            .create_location(
                NewLocation {
                    profile: test_profile(),
                    total_slots: 5,
                },
                Timestamp::UNIX_EPOCH,
            )
            .expect("location should be created");

        let result = ledger.update_location(foreign, test_profile(), Timestamp::UNIX_EPOCH);

        assert!(matches!(result, Err(LedgerError::LocationNotFound(_))));
    }

    #[test]
    fn toggle_flips_available_and_disabled_and_recounts() -> TestResult {
        let (mut ledger, key) = test_ledger_with_location(10)?;
        let first = ledger
            .location(key)?
            .slot_keys()
            .first()
            .copied()
            .expect("location has no slots");

        assert_eq!(ledger.toggle_slot(key, first)?, SlotStatus::Disabled);
        assert_eq!(ledger.location(key)?.available_slots(), 8);

        assert_eq!(ledger.toggle_slot(key, first)?, SlotStatus::Available);
        assert_eq!(ledger.location(key)?.available_slots(), 9);

        Ok(())
    }

    #[test]
    fn toggle_rejects_booked_slots() -> TestResult {
        let (mut ledger, key) = test_ledger_with_location(10)?;
        let first = ledger
            .location(key)?
            .slot_keys()
            .first()
            .copied()
            .expect("location has no slots");

        let now = Timestamp::UNIX_EPOCH;
        ledger.create_booking(
            BookingRequest {
                user_id: "user-1".to_owned(),
                location: key,
                slot: first,
                starts: now + 2.hours(),
                ends: now + 4.hours(),
                vehicle_number: None,
            },
            PaymentStatus::Paid,
            now,
        )?;

        assert!(matches!(
            ledger.toggle_slot(key, first),
            Err(LedgerError::SlotBooked(1))
        ));

        Ok(())
    }

    #[test]
    fn set_slot_price_rejects_negative_amounts() -> TestResult {
        let (mut ledger, key) = test_ledger_with_location(10)?;
        let first = ledger
            .location(key)?
            .slot_keys()
            .first()
            .copied()
            .expect("location has no slots");

        let result = ledger.set_slot_price(key, first, Money::from_minor(-100, USD));

        assert!(matches!(
            result,
            Err(LedgerError::Validation(ValidationError::NegativePrice))
        ));

        Ok(())
    }

    #[test]
    fn slot_lookup_rejects_keys_from_other_locations() -> TestResult {
        let (mut ledger, first_location) = test_ledger_with_location(5)?;
        let second_location = ledger.create_location(
            NewLocation {
                profile: test_profile(),
                total_slots: 5,
            },
            Timestamp::UNIX_EPOCH,
        )?;

        let foreign_slot = ledger
            .location(second_location)?
            .slot_keys()
            .first()
            .copied()
            .expect("location has no slots");

        assert!(matches!(
            ledger.slot(first_location, foreign_slot),
            Err(LedgerError::SlotNotFound(_))
        ));

        Ok(())
    }

    #[test]
    fn remove_location_drops_its_slots_but_keeps_bookings() -> TestResult {
        let (mut ledger, key) = test_ledger_with_location(5)?;
        let first = ledger
            .location(key)?
            .slot_keys()
            .first()
            .copied()
            .expect("location has no slots");

        let now = Timestamp::UNIX_EPOCH;
        let booking_key = ledger.create_booking(
            BookingRequest {
                user_id: "user-1".to_owned(),
                location: key,
                slot: first,
                starts: now + 2.hours(),
                ends: now + 4.hours(),
                vehicle_number: None,
            },
            PaymentStatus::Paid,
            now,
        )?;

        let removed = ledger.remove_location(key)?;

        assert_eq!(removed.total_slots(), 5);
        assert!(matches!(
            ledger.location(key),
            Err(LedgerError::LocationNotFound(_))
        ));

        let booking = ledger.booking(booking_key)?;

        assert_eq!(booking.location_name(), "Downtown Parking Plaza");
        assert_eq!(booking.slot_number(), 1);

        Ok(())
    }
}
