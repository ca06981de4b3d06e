//! # estate-front
//!
//! Client-side view layer for a property marketplace: paged listing browse
//! and search, the rotating reel strip, viewport breakpoints, and the agent
//! dashboard. All persistence and business rules live behind the remote API;
//! this crate holds view state and talks to that API through the traits in
//! [`api`].

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod layout;
pub mod listings;
pub mod models;
pub mod reels;

#[cfg(test)]
mod testing;
