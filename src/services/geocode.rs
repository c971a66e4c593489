//! Geocoding
//!
//! Address resolution is a pluggable seam. [`JitteredGeocoder`] stands
//! in for a real service by answering with a fixed city-centre base
//! point plus a small random offset per call.

use async_trait::async_trait;
use mockall::automock;
use rand::Rng;
use thiserror::Error;

use crate::locations::{GeoPoint, StreetAddress};

/// Errors surfaced by a geocoding service.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The address could not be resolved to coordinates.
    #[error("address could not be resolved: {0}")]
    Unresolved(String),
}

/// Resolves postal addresses to coordinates.
#[automock]
#[async_trait]
pub trait GeocodingService: Send + Sync {
    /// Resolves the address to a geographic position.
    async fn geocode(&self, address: &StreetAddress) -> Result<GeoPoint, GeocodeError>;
}

/// Stand-in geocoder: base point plus up to 0.1 degrees of jitter on
/// each axis.
#[derive(Debug, Clone, Copy)]
pub struct JitteredGeocoder {
    base: GeoPoint,
}

impl JitteredGeocoder {
    /// Maximum offset applied per axis, in decimal degrees.
    const JITTER: f64 = 0.1;

    /// Creates a geocoder centred on the given base point.
    #[must_use]
    pub fn new(base: GeoPoint) -> Self {
        Self { base }
    }
}

impl Default for JitteredGeocoder {
    /// Centres on downtown Manhattan, matching the demo seed catalog.
    fn default() -> Self {
        Self::new(GeoPoint {
            latitude: 40.7128,
            longitude: -74.0060,
        })
    }
}

#[async_trait]
impl GeocodingService for JitteredGeocoder {
    async fn geocode(&self, _address: &StreetAddress) -> Result<GeoPoint, GeocodeError> {
        let mut rng = rand::thread_rng();

        Ok(GeoPoint {
            latitude: self.base.latitude + rng.gen_range(0.0..Self::JITTER),
            longitude: self.base.longitude + rng.gen_range(0.0..Self::JITTER),
        })
    }
}

/// Geocoder that always answers with the same point; for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeocoder(pub GeoPoint);

#[async_trait]
impl GeocodingService for FixedGeocoder {
    async fn geocode(&self, _address: &StreetAddress) -> Result<GeoPoint, GeocodeError> {
        Ok(self.0)
    }
}
