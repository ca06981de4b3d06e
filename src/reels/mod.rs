pub mod cache;
pub mod scheduler;

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;

pub use cache::{MemorySessionCache, SessionCache, DISPLAYED_REELS_KEY, REELS_TIMESTAMP_KEY};
pub use scheduler::{pick_random_subset, Clock, ReelScheduler, RotationSettings};
