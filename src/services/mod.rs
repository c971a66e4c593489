//! Simulated external services
//!
//! Payment, geocoding and distance estimation are pluggable strategies.
//! The shipped implementations are stand-ins with artificial delays and
//! random values; tests swap in the fixed variants or mockall mocks.

pub mod distance;
pub mod geocode;
pub mod payment;

pub use distance::{DistanceEstimator, FixedDistance, UniformRandomDistance};
pub use geocode::{FixedGeocoder, GeocodeError, GeocodingService, JitteredGeocoder};
pub use payment::{InstantPayment, PaymentError, PaymentProcessor, SimulatedCardPayment};
