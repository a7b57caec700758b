//! Live leaderboard push over WebSocket.
//!
//! Every connected client receives the full roster snapshot on connect and
//! again on every controller state change, plus periodic pings.

mod handler;
mod heartbeat;
pub mod manager;
pub mod push;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
pub use push::{roster_frame, start_roster_push};
