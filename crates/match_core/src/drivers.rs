//! Driver records and the concurrency-safe driver registry.
//!
//! The registry map is guarded by a `parking_lot::RwLock`; per-driver
//! availability is an `AtomicBool` so claims never hold the map lock.
//! Availability is the contended resource: `try_claim` is the only path from
//! Available to Claimed and succeeds for at most one concurrent caller.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::MatchError;
use crate::spatial::Location;
use crate::views::DriverView;

/// A registered driver. Identity is fixed at registration; position and
/// availability change over the driver's lifetime.
#[derive(Debug)]
pub struct Driver {
    id: String,
    location: RwLock<Location>,
    available: AtomicBool,
}

impl Driver {
    /// New drivers start Available.
    pub fn new(id: impl Into<String>, location: Location) -> Self {
        Self {
            id: id.into(),
            location: RwLock::new(location),
            available: AtomicBool::new(true),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Last reported position.
    pub fn location(&self) -> Location {
        *self.location.read()
    }

    pub fn update_location(&self, location: Location) {
        *self.location.write() = location;
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    /// Atomic Available -> Claimed transition. Returns whether this caller
    /// won the claim; at most one concurrent caller can.
    #[must_use]
    pub fn try_claim(&self) -> bool {
        self.available
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Unconditional Claimed -> Available transition.
    pub fn release(&self) {
        self.available.store(true, Ordering::SeqCst);
    }
}

/// The driver-service role: registration, lookup, position/availability
/// updates, and the snapshots allocation ranks over.
pub trait DriverService: Send + Sync {
    /// Register a new driver, initially Available. Rejects an id that is
    /// already present.
    fn register(&self, id: &str, location: Location) -> Result<(), MatchError>;

    fn find(&self, id: &str) -> Option<Arc<Driver>>;

    /// Update position unconditionally and set availability: `true` releases,
    /// `false` attempts a claim and succeeds even when the claim is lost.
    fn update(&self, id: &str, location: Location, available: bool)
        -> Result<DriverView, MatchError>;

    /// Point-in-time snapshot of every registered driver. Not synchronized
    /// with subsequent mutations.
    fn all(&self) -> Vec<Arc<Driver>>;

    /// Snapshot of drivers reporting Available at read time.
    fn available_drivers(&self) -> Vec<Arc<Driver>>;
}

/// In-memory production implementation of [`DriverService`].
#[derive(Debug, Default)]
pub struct DriverRegistry {
    drivers: RwLock<HashMap<String, Arc<Driver>>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DriverService for DriverRegistry {
    fn register(&self, id: &str, location: Location) -> Result<(), MatchError> {
        if id.is_empty() {
            return Err(MatchError::InvalidInput("driver id must not be empty"));
        }
        let mut drivers = self.drivers.write();
        match drivers.entry(id.to_string()) {
            Entry::Occupied(_) => Err(MatchError::DuplicateDriver(id.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(Driver::new(id, location)));
                info!(driver_id = id, "driver registered");
                Ok(())
            }
        }
    }

    fn find(&self, id: &str) -> Option<Arc<Driver>> {
        self.drivers.read().get(id).cloned()
    }

    fn update(
        &self,
        id: &str,
        location: Location,
        available: bool,
    ) -> Result<DriverView, MatchError> {
        let driver = self
            .find(id)
            .ok_or_else(|| MatchError::DriverNotFound(id.to_string()))?;
        driver.update_location(location);
        if available {
            driver.release();
        } else {
            // May lose to a concurrent claim; the update itself still succeeds.
            let _ = driver.try_claim();
        }
        debug!(driver_id = id, available = driver.is_available(), "driver updated");
        Ok(DriverView::from(driver.as_ref()))
    }

    fn all(&self) -> Vec<Arc<Driver>> {
        self.drivers.read().values().cloned().collect()
    }

    fn available_drivers(&self) -> Vec<Arc<Driver>> {
        self.drivers
            .read()
            .values()
            .filter(|driver| driver.is_available())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_driver_is_available_by_default() {
        let registry = DriverRegistry::new();
        registry
            .register("driver-1", Location::new(1.0, 2.0))
            .expect("registration should succeed");

        let driver = registry.find("driver-1").expect("driver should be present");
        assert!(driver.is_available());
        assert_eq!(driver.location(), Location::new(1.0, 2.0));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let registry = DriverRegistry::new();
        registry
            .register("driver-1", Location::new(0.0, 0.0))
            .expect("first registration should succeed");

        let err = registry
            .register("driver-1", Location::new(5.0, 5.0))
            .expect_err("second registration should fail");
        assert_eq!(err, MatchError::DuplicateDriver("driver-1".into()));

        // The original record is untouched.
        let driver = registry.find("driver-1").expect("driver should be present");
        assert_eq!(driver.location(), Location::new(0.0, 0.0));
    }

    #[test]
    fn empty_id_is_rejected() {
        let registry = DriverRegistry::new();
        let err = registry
            .register("", Location::new(0.0, 0.0))
            .expect_err("empty id should be rejected");
        assert!(matches!(err, MatchError::InvalidInput(_)));
    }

    #[test]
    fn update_moves_driver_and_sets_availability() {
        let registry = DriverRegistry::new();
        registry
            .register("driver-1", Location::new(0.0, 0.0))
            .expect("registration should succeed");

        let view = registry
            .update("driver-1", Location::new(3.0, 4.0), false)
            .expect("update should succeed");
        assert_eq!((view.x, view.y), (3.0, 4.0));
        assert!(!view.available);

        let view = registry
            .update("driver-1", Location::new(6.0, 8.0), true)
            .expect("update should succeed");
        assert!(view.available);
        assert_eq!(
            registry
                .find("driver-1")
                .expect("driver should be present")
                .location(),
            Location::new(6.0, 8.0)
        );
    }

    #[test]
    fn update_of_unknown_driver_fails() {
        let registry = DriverRegistry::new();
        let err = registry
            .update("ghost", Location::new(0.0, 0.0), true)
            .expect_err("unknown driver should fail");
        assert_eq!(err, MatchError::DriverNotFound("ghost".into()));
    }

    #[test]
    fn claim_succeeds_once_until_released() {
        let driver = Driver::new("driver-1", Location::new(0.0, 0.0));

        assert!(driver.try_claim());
        assert!(!driver.try_claim());
        assert!(!driver.is_available());

        driver.release();
        assert!(driver.is_available());
        assert!(driver.try_claim());
    }

    #[test]
    fn available_drivers_filters_by_state_at_read_time() {
        let registry = DriverRegistry::new();
        registry
            .register("driver-1", Location::new(0.0, 0.0))
            .expect("registration should succeed");
        registry
            .register("driver-2", Location::new(1.0, 1.0))
            .expect("registration should succeed");

        let claimed = registry.find("driver-1").expect("driver should be present");
        assert!(claimed.try_claim());

        let available = registry.available_drivers();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id(), "driver-2");
        assert_eq!(registry.all().len(), 2);
    }
}
