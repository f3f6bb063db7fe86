//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` pushes tally events to connected
//! screens. Clients subscribe to beverage ids (or `"*"`); event-level
//! notifications such as finalization, reset and archive changes reach
//! every connection.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
