//! Durable storage layer: PostgreSQL write-through archive.
//!
//! Optional at runtime (`PERSISTENCE_ENABLED`). The in-memory domain
//! stores are authoritative; this layer records animals, safe zones,
//! and telemetry for durability and re-hydrates state at startup.

pub mod models;
pub mod postgres;

pub use postgres::PostgresPersistence;
