//! Concurrency-safe ride matching: nearest-driver allocation over a shared
//! driver pool, and the ride lifecycle built on top of it.

pub mod drivers;
pub mod error;
pub mod lifecycle;
pub mod matching;
pub mod rides;
pub mod spatial;
pub mod views;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;
