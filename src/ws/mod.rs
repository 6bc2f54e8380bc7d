//! WebSocket layer: connection handling and topic subscriptions.
//!
//! The WebSocket endpoint at `/ws` lets clients subscribe to per-animal
//! event topics and receive location and heart-rate updates in real time.

pub mod connection;
pub mod handler;
pub mod messages;
