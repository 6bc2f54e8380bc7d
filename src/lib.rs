//! # petdex-gateway
//!
//! REST API and WebSocket gateway for the PetDex pet-tracking collar
//! platform.
//!
//! Collars report location and heart-rate readings over HTTP; the
//! gateway validates them, evaluates each position against the animal's
//! circular safe zone, stores the reading, and pushes the enriched
//! event to WebSocket clients subscribed to the animal's topic.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── Services (service/)
//!     ├── RealtimeNotifier (domain/)
//!     │
//!     ├── Stores + SafeZoneEvaluator (domain/)
//!     │
//!     └── PostgreSQL Persistence (optional)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
