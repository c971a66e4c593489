//! Distance estimation

use mockall::automock;
use rand::Rng;

use crate::locations::GeoPoint;

/// Estimates the distance between two points in kilometres.
#[automock]
pub trait DistanceEstimator: Send + Sync {
    /// Estimated distance from `from` to `to` in kilometres.
    fn estimate_km(&self, from: GeoPoint, to: GeoPoint) -> f64;
}

/// Stand-in estimator: a uniform random distance between 0.5 and 5.5 km,
/// ignoring the coordinates entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformRandomDistance;

impl DistanceEstimator for UniformRandomDistance {
    fn estimate_km(&self, _from: GeoPoint, _to: GeoPoint) -> f64 {
        rand::thread_rng().gen_range(0.5..5.5)
    }
}

/// Estimator that always answers with the same distance; for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedDistance(pub f64);

impl DistanceEstimator for FixedDistance {
    fn estimate_km(&self, _from: GeoPoint, _to: GeoPoint) -> f64 {
        self.0
    }
}
