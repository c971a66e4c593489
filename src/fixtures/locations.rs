//! Location Fixtures

use jiff::{Timestamp, civil::Time};
use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::Deserialize;
use smallvec::SmallVec;

use crate::{
    fixtures::FixtureError,
    locations::{
        ContactInfo, Feature, GeoPoint, LocationProfile, NewLocation, OperatingHours, ParkingType,
        PriceRule, RateBand, StreetAddress, WeekdaySchedule,
    },
    slots::VehicleType,
};

/// Wrapper for locations in YAML
#[derive(Debug, Deserialize)]
pub struct LocationsFixture {
    /// Map of location key -> location fixture
    pub locations: FxHashMap<String, LocationFixture>,
}

/// Location fixture from YAML
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LocationFixture {
    /// Display name
    pub name: String,

    /// Longer description of the facility
    pub description: String,

    /// Kind of facility
    pub parking_type: ParkingType,

    /// Contact details
    pub contact: ContactInfo,

    /// Postal address
    pub address: StreetAddress,

    /// Geographic position
    pub position: GeoPoint,

    /// Amenities offered at the facility
    pub features: Vec<Feature>,

    /// Weekly operating hours
    pub hours: HoursFixture,

    /// Pricing rules; the first rule seeds slot prices
    pub price_rules: Vec<PriceRuleFixture>,

    /// Whether the location accepts bookings
    pub is_active: bool,

    /// Number of slots to create
    pub total_slots: u32,

    /// Creation timestamp (RFC 3339)
    pub created_at: Timestamp,
}

/// Operating hours from YAML
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HoursFixture {
    /// Fallback opening time for days without an override
    pub default_open: Time,

    /// Fallback closing time for days without an override
    pub default_close: Time,

    /// Per-day overrides
    #[serde(default)]
    pub weekdays: Vec<WeekdaySchedule>,
}

/// Price rule from YAML
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PriceRuleFixture {
    /// Rule name
    pub name: String,

    /// Vehicle class the rule covers
    pub vehicle_type: VehicleType,

    /// Time band the rule covers
    pub band: RateBand,

    /// Start of the band
    pub starts: Time,

    /// End of the band
    pub ends: Time,

    /// Hourly rate (e.g. "5.00 USD")
    pub hourly_rate: String,

    /// Daily rate (e.g. "40.00 USD")
    pub daily_rate: String,

    /// Weekly rate, if offered
    pub weekly_rate: Option<String>,

    /// Monthly rate, if offered
    pub monthly_rate: Option<String>,
}

impl From<HoursFixture> for OperatingHours {
    fn from(fixture: HoursFixture) -> Self {
        let mut hours = OperatingHours::daily(fixture.default_open, fixture.default_close);

        for schedule in fixture.weekdays {
            if let Some(entry) = hours
                .weekdays
                .iter_mut()
                .find(|existing| existing.day == schedule.day)
            {
                *entry = schedule;
            }
        }

        hours
    }
}

impl TryFrom<PriceRuleFixture> for PriceRule {
    type Error = FixtureError;

    fn try_from(fixture: PriceRuleFixture) -> Result<Self, Self::Error> {
        let (hourly_minor, hourly_currency) = parse_price(&fixture.hourly_rate)?;
        let (daily_minor, daily_currency) = parse_price(&fixture.daily_rate)?;

        let weekly_rate = fixture
            .weekly_rate
            .as_deref()
            .map(parse_price)
            .transpose()?
            .map(|(minor_units, currency)| Money::from_minor(minor_units, currency));

        let monthly_rate = fixture
            .monthly_rate
            .as_deref()
            .map(parse_price)
            .transpose()?
            .map(|(minor_units, currency)| Money::from_minor(minor_units, currency));

        Ok(PriceRule {
            name: fixture.name,
            vehicle_type: fixture.vehicle_type,
            band: fixture.band,
            starts: fixture.starts,
            ends: fixture.ends,
            hourly_rate: Money::from_minor(hourly_minor, hourly_currency),
            daily_rate: Money::from_minor(daily_minor, daily_currency),
            weekly_rate,
            monthly_rate,
        })
    }
}

impl TryFrom<LocationFixture> for NewLocation {
    type Error = FixtureError;

    fn try_from(fixture: LocationFixture) -> Result<Self, Self::Error> {
        let price_rules = fixture
            .price_rules
            .into_iter()
            .map(PriceRule::try_from)
            .collect::<Result<SmallVec<[PriceRule; 2]>, _>>()?;

        let profile = LocationProfile {
            name: fixture.name,
            description: fixture.description,
            parking_type: fixture.parking_type,
            contact: fixture.contact,
            address: fixture.address,
            position: fixture.position,
            features: fixture.features.into_iter().collect(),
            hours: fixture.hours.into(),
            price_rules,
            is_active: fixture.is_active,
        };

        Ok(NewLocation {
            profile,
            total_slots: fixture.total_slots,
        })
    }
}

/// Parse a price string like "5.00 USD" into minor units and a currency
///
/// # Errors
///
/// Returns an error if the string is malformed, the amount does not land
/// on a whole number of minor units, or the currency code is unknown.
pub fn parse_price(raw: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let Some((amount, code)) = raw.trim().split_once(' ') else {
        return Err(FixtureError::InvalidPrice(raw.to_string()));
    };

    let currency = iso::find(code).ok_or_else(|| FixtureError::UnknownCurrency(code.to_string()))?;

    let value = Decimal::from_str_exact(amount)
        .map_err(|_err| FixtureError::InvalidPrice(raw.to_string()))?;

    let scale = Decimal::from_i64(10_i64.pow(currency.exponent)).unwrap_or(Decimal::ZERO);

    let Some(scaled) = value.checked_mul(scale) else {
        return Err(FixtureError::InvalidPrice(raw.to_string()));
    };

    if scaled.fract() != Decimal::ZERO {
        return Err(FixtureError::InvalidPrice(raw.to_string()));
    }

    scaled
        .to_i64()
        .map(|minor_units| (minor_units, currency))
        .ok_or_else(|| FixtureError::InvalidPrice(raw.to_string()))
}
