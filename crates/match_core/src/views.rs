//! Read models handed to the request-handling layer.

use serde::Serialize;

use crate::drivers::Driver;
use crate::rides::Ride;

/// Driver read model: id, position, and availability at read time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverView {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub available: bool,
}

impl From<&Driver> for DriverView {
    fn from(driver: &Driver) -> Self {
        let location = driver.location();
        Self {
            id: driver.id().to_string(),
            x: location.x,
            y: location.y,
            available: driver.is_available(),
        }
    }
}

/// Ride read model returned from a successful request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RideView {
    pub ride_id: String,
    pub driver_id: String,
    pub rider_id: String,
    pub pickup_x: f64,
    pub pickup_y: f64,
}

impl From<&Ride> for RideView {
    fn from(ride: &Ride) -> Self {
        let pickup = ride.pickup();
        Self {
            ride_id: ride.id().to_string(),
            driver_id: ride.driver().id().to_string(),
            rider_id: ride.rider_id().to_string(),
            pickup_x: pickup.x,
            pickup_y: pickup.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::spatial::Location;

    #[test]
    fn ride_view_carries_the_binding() {
        let driver = Arc::new(Driver::new("driver-1", Location::new(2.0, 3.0)));
        assert!(driver.try_claim());
        let ride = Ride::new("ride-1", "rider-1", driver, Location::new(1.0, 4.0));

        let view = RideView::from(&ride);
        assert_eq!(view.ride_id, "ride-1");
        assert_eq!(view.driver_id, "driver-1");
        assert_eq!(view.rider_id, "rider-1");
        assert_eq!((view.pickup_x, view.pickup_y), (1.0, 4.0));
    }

    #[test]
    fn driver_view_reflects_availability_at_read_time() {
        let driver = Driver::new("driver-1", Location::new(0.5, -0.5));
        assert!(DriverView::from(&driver).available);

        assert!(driver.try_claim());
        let view = DriverView::from(&driver);
        assert!(!view.available);
        assert_eq!((view.x, view.y), (0.5, -0.5));
    }
}
