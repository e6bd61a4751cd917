//! Ride lifecycle orchestration: request and completion.
//!
//! A ride moves Requested -> Active (driver bound) -> Completed; Completed is
//! terminal. A failed request never leaves a persisted ride behind, and a
//! save failure after a successful claim is compensated by releasing the
//! driver before the error surfaces.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::MatchError;
use crate::matching::DriverAllocator;
use crate::rides::{Ride, RideStore};
use crate::spatial::Location;
use crate::views::RideView;

/// The ride-service role consumed by the request-handling layer.
pub trait RideService: Send + Sync {
    fn request_ride(&self, rider_id: &str, pickup: Location) -> Result<RideView, MatchError>;

    fn complete_ride(&self, ride_id: &str) -> Result<(), MatchError>;
}

/// Production implementation of [`RideService`] over an allocator and a ride
/// store.
pub struct RideLifecycle {
    allocator: Arc<dyn DriverAllocator>,
    rides: Arc<dyn RideStore>,
}

impl RideLifecycle {
    pub fn new(allocator: Arc<dyn DriverAllocator>, rides: Arc<dyn RideStore>) -> Self {
        Self { allocator, rides }
    }
}

impl RideService for RideLifecycle {
    fn request_ride(&self, rider_id: &str, pickup: Location) -> Result<RideView, MatchError> {
        if rider_id.is_empty() {
            return Err(MatchError::InvalidInput("rider id must not be empty"));
        }

        let driver = self.allocator.allocate_nearest(pickup)?;
        let ride = Arc::new(Ride::new(
            Uuid::new_v4().to_string(),
            rider_id,
            Arc::clone(&driver),
            pickup,
        ));

        if let Err(cause) = self.rides.save(Arc::clone(&ride)) {
            // Compensating release: the claim must not outlive a ride that
            // was never persisted.
            driver.release();
            warn!(driver_id = driver.id(), %cause, "ride save failed, driver released");
            return Err(MatchError::Save(cause));
        }

        info!(
            ride_id = ride.id(),
            driver_id = driver.id(),
            rider_id,
            "ride created"
        );
        Ok(RideView::from(ride.as_ref()))
    }

    fn complete_ride(&self, ride_id: &str) -> Result<(), MatchError> {
        if ride_id.is_empty() {
            return Err(MatchError::InvalidInput("ride id must not be empty"));
        }

        let ride = self
            .rides
            .find(ride_id)
            .ok_or_else(|| MatchError::RideNotFound(ride_id.to_string()))?;

        // Exactly one completion event may release the driver.
        if !ride.try_complete() {
            return Err(MatchError::AlreadyCompleted(ride_id.to_string()));
        }
        ride.driver().release();

        info!(ride_id, driver_id = ride.driver().id(), "ride completed");
        Ok(())
    }
}
