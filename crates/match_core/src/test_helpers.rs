//! Test helpers for common setup across test files.

use std::sync::Arc;

use crate::drivers::{Driver, DriverRegistry, DriverService};
use crate::lifecycle::RideLifecycle;
use crate::matching::NearestFirst;
use crate::rides::RideRegistry;
use crate::spatial::Location;

/// The full production stack over fresh in-memory registries.
pub struct MatchStack {
    pub drivers: Arc<DriverRegistry>,
    pub rides: Arc<RideRegistry>,
    pub allocator: Arc<NearestFirst>,
    pub lifecycle: Arc<RideLifecycle>,
}

/// Wire up registries, allocator, and lifecycle the way production code does.
pub fn match_stack() -> MatchStack {
    let drivers = Arc::new(DriverRegistry::new());
    let rides = Arc::new(RideRegistry::new());
    let allocator = Arc::new(NearestFirst::new(drivers.clone()));
    let lifecycle = Arc::new(RideLifecycle::new(allocator.clone(), rides.clone()));
    MatchStack {
        drivers,
        rides,
        allocator,
        lifecycle,
    }
}

/// Register a driver at `(x, y)` and return its record.
///
/// # Panics
///
/// Panics if registration fails (duplicate or empty id).
pub fn register_driver(registry: &DriverRegistry, id: &str, x: f64, y: f64) -> Arc<Driver> {
    registry
        .register(id, Location::new(x, y))
        .expect("driver registration should succeed");
    registry
        .find(id)
        .expect("registered driver should be present")
}
