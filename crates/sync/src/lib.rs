//! Roster synchronization for Typeboard.
//!
//! - [`LeaderboardController`]: the single in-process cache of the player
//!   roster. Every mutation and every remote change notification triggers a
//!   full re-fetch from the store.
//! - [`RosterState`] / [`RosterSnapshot`]: the controller's state machine
//!   and its view-facing projection.
//! - [`MemoryPlayerStore`]: an in-memory [`PlayerStore`] that ranks and
//!   notifies like the PostgreSQL backend.
//!
//! [`PlayerStore`]: typeboard_core::store::PlayerStore

pub mod controller;
pub mod memory;
pub mod state;

pub use controller::LeaderboardController;
pub use memory::MemoryPlayerStore;
pub use state::{RosterSnapshot, RosterState};
