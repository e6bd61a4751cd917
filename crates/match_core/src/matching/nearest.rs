use std::sync::Arc;

use tracing::debug;

use crate::drivers::{Driver, DriverService};
use crate::error::MatchError;
use crate::spatial::{distance, Location};
use crate::views::DriverView;

use super::allocator::DriverAllocator;

/// Nearest-first allocation with atomic claim and fallback.
///
/// Ranks a point-in-time snapshot of available drivers by ascending Euclidean
/// distance and claims candidates in rank order. The snapshot may be stale;
/// rather than re-validating under a lock, a lost claim just moves the loop to
/// the next-ranked candidate. Mutual exclusion per driver rests entirely on
/// the claim's compare-and-set, never on the snapshot.
pub struct NearestFirst {
    drivers: Arc<dyn DriverService>,
}

impl NearestFirst {
    pub fn new(drivers: Arc<dyn DriverService>) -> Self {
        Self { drivers }
    }

    /// Available drivers by ascending distance to `pickup`. The sort is
    /// stable: equidistant drivers keep snapshot order.
    fn ranked_candidates(&self, pickup: Location) -> Vec<Arc<Driver>> {
        let mut candidates: Vec<(f64, Arc<Driver>)> = self
            .drivers
            .available_drivers()
            .into_iter()
            .map(|driver| (distance(driver.location(), pickup), driver))
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
        candidates.into_iter().map(|(_, driver)| driver).collect()
    }
}

impl DriverAllocator for NearestFirst {
    fn allocate_nearest(&self, pickup: Location) -> Result<Arc<Driver>, MatchError> {
        for candidate in self.ranked_candidates(pickup) {
            if candidate.try_claim() {
                debug!(driver_id = candidate.id(), "driver claimed");
                return Ok(candidate);
            }
            // Claimed by a concurrent caller between snapshot and attempt.
            debug!(driver_id = candidate.id(), "claim lost, trying next candidate");
        }
        Err(MatchError::NoAvailableDrivers)
    }

    fn list_nearest(&self, pickup: Location, limit: usize) -> Vec<DriverView> {
        self.ranked_candidates(pickup)
            .iter()
            .take(limit)
            .map(|driver| DriverView::from(driver.as_ref()))
            .collect()
    }
}
