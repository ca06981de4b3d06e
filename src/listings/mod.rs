pub mod controller;

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

pub use controller::{ActiveSearch, ListingController};
