//! Typeboard change-notification infrastructure.
//!
//! - [`ChangeBus`]: in-process publish/subscribe hub for roster changes,
//!   backed by `tokio::sync::broadcast`.
//! - [`RosterChange`]: one observed insert, update, or delete on the
//!   player collection.
//! - [`spawn_subscription`]: turns a bus receiver into payload-free
//!   `on_change` callbacks behind a cancellable [`Subscription`].
//!
//! [`Subscription`]: typeboard_core::store::Subscription

pub mod bus;
pub mod subscription;

pub use bus::{ChangeBus, ChangeOp, RosterChange};
pub use subscription::spawn_subscription;
