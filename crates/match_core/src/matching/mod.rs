pub mod allocator;
pub mod nearest;

pub use allocator::DriverAllocator;
pub use nearest::NearestFirst;
