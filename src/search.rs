//! Location search
//!
//! Read-only queries over the ledger's locations: case-insensitive text
//! filtering on name and street line, and sorting by distance, headline
//! price, or availability. Distance comes from a caller-supplied
//! [`DistanceEstimator`] so every hit can be rendered with one.

use std::cmp::Reverse;

use rusty_money::{Money, iso::Currency};

use crate::{
    ledger::ParkingLedger,
    locations::{GeoPoint, LocationKey, ParkingLocation},
    services::distance::DistanceEstimator,
};

/// Sort order for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    /// Nearest first.
    Distance,

    /// Cheapest headline hourly rate first.
    Price,

    /// Most available slots first.
    Availability,
}

/// A location search: optional text filter plus a sort order.
#[derive(Debug, Clone, Default)]
pub struct LocationQuery {
    /// Case-insensitive substring matched against name and street line.
    pub text: Option<String>,

    /// Drop locations that are not accepting bookings.
    pub active_only: bool,

    /// Sort order; ledger order when `None`.
    pub sort_by: Option<SortBy>,
}

/// One search result.
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    /// Key of the matched location.
    pub key: LocationKey,

    /// The matched location.
    pub location: &'a ParkingLocation,

    /// Estimated distance from the search origin, in kilometres.
    pub distance_km: f64,
}

impl SearchHit<'_> {
    /// Headline hourly rate: the first price rule's hourly rate.
    #[must_use]
    pub fn headline_rate(&self) -> Option<&Money<'static, Currency>> {
        self.location
            .profile()
            .price_rules
            .first()
            .map(|rule| &rule.hourly_rate)
    }
}

/// Runs a query against every location in the ledger.
pub fn search_locations<'a>(
    ledger: &'a ParkingLedger,
    query: &LocationQuery,
    origin: GeoPoint,
    distance: &dyn DistanceEstimator,
) -> Vec<SearchHit<'a>> {
    let needle = query.text.as_deref().map(str::to_lowercase);

    let mut hits: Vec<SearchHit<'a>> = ledger
        .locations()
        .filter(|(_, location)| {
            if query.active_only && !location.profile().is_active {
                return false;
            }

            match &needle {
                Some(needle) => {
                    location.name().to_lowercase().contains(needle)
                        || location
                            .profile()
                            .address
                            .line
                            .to_lowercase()
                            .contains(needle)
                }
                None => true,
            }
        })
        .map(|(key, location)| SearchHit {
            key,
            location,
            distance_km: distance.estimate_km(origin, location.profile().position),
        })
        .collect();

    match query.sort_by {
        Some(SortBy::Distance) => {
            hits.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        }
        Some(SortBy::Price) => {
            hits.sort_by_key(|hit| hit.headline_rate().map(Money::to_minor_units));
        }
        Some(SortBy::Availability) => {
            hits.sort_by_key(|hit| Reverse(hit.location.available_slots()));
        }
        None => {}
    }

    hits
}
