//! Valet prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    billing::{BillingError, billable_hours, window_total},
    bookings::{Booking, BookingKey, BookingRequest, BookingStatus, PaymentStatus},
    desk::{BookingDesk, DeskError},
    fixtures::{Fixture, FixtureError},
    ledger::{LedgerError, ParkingLedger, ValidationError},
    locations::{
        ContactInfo, Feature, GeoPoint, LocationKey, LocationProfile, NewLocation, OperatingHours,
        ParkingLocation, ParkingType, PriceRule, RateBand, StreetAddress, Weekday, WeekdaySchedule,
    },
    report::{LedgerSummary, ReportError},
    search::{LocationQuery, SearchHit, SortBy, search_locations},
    services::{
        DistanceEstimator, FixedDistance, FixedGeocoder, GeocodeError, GeocodingService,
        InstantPayment, JitteredGeocoder, PaymentError, PaymentProcessor, SimulatedCardPayment,
        UniformRandomDistance,
    },
    slots::{ParkingSlot, SlotKey, SlotStatus, VehicleType},
};
