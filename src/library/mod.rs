//! Remote library access.
//!
//! `client` wraps the Plex HTTP API; `records` holds the wire types it
//! deserializes. Everything downstream of normalization is independent of
//! this module.

pub mod client;
pub mod records;

pub use client::PlexClient;
pub use records::MediaRecord;
