use std::sync::Arc;

use crate::drivers::Driver;
use crate::error::MatchError;
use crate::spatial::Location;
use crate::views::DriverView;

/// The matching-service role: binding a pickup to a driver, and the
/// read-only discovery query next to it.
pub trait DriverAllocator: Send + Sync {
    /// Select and atomically claim a driver for the pickup.
    ///
    /// Returns the claimed driver, or [`MatchError::NoAvailableDrivers`] when
    /// the pool is empty or every candidate was claimed by a concurrent
    /// caller first.
    fn allocate_nearest(&self, pickup: Location) -> Result<Arc<Driver>, MatchError>;

    /// Up to `limit` available drivers by ascending distance to `pickup`.
    /// Read-only: no claims are attempted.
    fn list_nearest(&self, pickup: Location, limit: usize) -> Vec<DriverView>;
}
