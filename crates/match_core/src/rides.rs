//! Ride records and the append-only ride registry.
//!
//! A ride binds a claimed driver for its whole active lifetime. The
//! `completed` flag is an `AtomicBool` moved false -> true by a compare-and-set
//! so exactly one completion event can release the bound driver. Rides are
//! never deleted; the registry doubles as lookup history.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::drivers::Driver;
use crate::error::StoreError;
use crate::spatial::Location;

/// An active or completed ride.
#[derive(Debug)]
pub struct Ride {
    id: String,
    rider_id: String,
    driver: Arc<Driver>,
    pickup: Location,
    completed: AtomicBool,
}

impl Ride {
    /// The driver must already be Claimed when the ride is constructed; the
    /// ride only holds the reference used to route the release at completion.
    pub fn new(
        id: impl Into<String>,
        rider_id: impl Into<String>,
        driver: Arc<Driver>,
        pickup: Location,
    ) -> Self {
        Self {
            id: id.into(),
            rider_id: rider_id.into(),
            driver,
            pickup,
            completed: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rider_id(&self) -> &str {
        &self.rider_id
    }

    pub fn driver(&self) -> &Arc<Driver> {
        &self.driver
    }

    /// Pickup snapshot taken at creation.
    pub fn pickup(&self) -> Location {
        self.pickup
    }

    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::SeqCst)
    }

    /// Atomic false -> true transition of the completed flag. At most one
    /// caller ever wins; losers must not release the driver.
    #[must_use]
    pub fn try_complete(&self) -> bool {
        self.completed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

/// Persistence seam for rides. The in-memory implementation cannot fail; the
/// `Result` exists so the lifecycle's compensation path can be exercised with
/// a substitute store.
pub trait RideStore: Send + Sync {
    fn save(&self, ride: Arc<Ride>) -> Result<(), StoreError>;

    fn find(&self, id: &str) -> Option<Arc<Ride>>;

    /// Point-in-time snapshot of every persisted ride.
    fn all(&self) -> Vec<Arc<Ride>>;
}

/// In-memory production implementation of [`RideStore`].
#[derive(Debug, Default)]
pub struct RideRegistry {
    rides: RwLock<HashMap<String, Arc<Ride>>>,
}

impl RideRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RideStore for RideRegistry {
    fn save(&self, ride: Arc<Ride>) -> Result<(), StoreError> {
        self.rides.write().insert(ride.id().to_string(), ride);
        Ok(())
    }

    fn find(&self, id: &str) -> Option<Arc<Ride>> {
        self.rides.read().get(id).cloned()
    }

    fn all(&self) -> Vec<Arc<Ride>> {
        self.rides.read().values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claimed_driver() -> Arc<Driver> {
        let driver = Arc::new(Driver::new("driver-1", Location::new(0.0, 0.0)));
        assert!(driver.try_claim());
        driver
    }

    #[test]
    fn completion_flag_moves_once() {
        let ride = Ride::new("ride-1", "rider-1", claimed_driver(), Location::new(1.0, 1.0));

        assert!(!ride.is_completed());
        assert!(ride.try_complete());
        assert!(ride.is_completed());
        assert!(!ride.try_complete());
    }

    #[test]
    fn saved_rides_are_retrievable() {
        let registry = RideRegistry::new();
        let ride = Arc::new(Ride::new(
            "ride-1",
            "rider-1",
            claimed_driver(),
            Location::new(1.0, 1.0),
        ));
        registry.save(ride).expect("in-memory save cannot fail");

        let found = registry.find("ride-1").expect("ride should be present");
        assert_eq!(found.rider_id(), "rider-1");
        assert_eq!(found.pickup(), Location::new(1.0, 1.0));
        assert!(registry.find("ride-2").is_none());
        assert_eq!(registry.all().len(), 1);
    }
}
