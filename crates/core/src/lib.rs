//! Domain types and rules for the typing leaderboard.
//!
//! This crate has no I/O. It defines the player model and its validation,
//! the ranking order shared with the database trigger, dashboard statistics,
//! standing tiers for views, the admin gate, and the [`store::PlayerStore`]
//! seam implemented by the storage backends.

pub mod admin_gate;
pub mod error;
pub mod player;
pub mod ranking;
pub mod standing;
pub mod stats;
pub mod store;
pub mod types;
