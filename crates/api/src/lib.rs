//! Typeboard API server library.
//!
//! Exposes config, state, error handling, routes, views, and the WebSocket
//! push so integration tests and the binary entrypoint share them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod inflight;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod views;
pub mod ws;
