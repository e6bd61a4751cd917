//! Error taxonomy for the matching core.
//!
//! All failures are surfaced to the caller as typed values; none are retried
//! internally. `Save` is the only condition paired with a compensating action
//! (the claimed driver is released before the error is returned).

use thiserror::Error;

/// Persistence failure reported by a ride store.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct StoreError(pub String);

/// Errors surfaced by the matching core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// No driver with this id is registered.
    #[error("driver not found: {0}")]
    DriverNotFound(String),

    /// No ride with this id was ever created.
    #[error("ride not found: {0}")]
    RideNotFound(String),

    /// The availability snapshot was empty, or every claim attempt was lost
    /// to a concurrent caller.
    #[error("no available drivers")]
    NoAvailableDrivers,

    /// A driver with this id is already registered.
    #[error("driver already registered: {0}")]
    DuplicateDriver(String),

    /// The ride's completed flag was already set.
    #[error("ride already completed: {0}")]
    AlreadyCompleted(String),

    /// Ride persistence failed after a successful claim. The claimed driver
    /// has already been released when this is returned.
    #[error("failed to save ride: {0}")]
    Save(#[from] StoreError),

    /// Malformed caller input, rejected before any side effect.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_error_carries_the_store_cause() {
        let err = MatchError::from(StoreError("disk full".into()));
        assert_eq!(err.to_string(), "failed to save ride: disk full");
    }
}
