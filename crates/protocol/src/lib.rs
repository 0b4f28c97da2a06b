//! Wire types for the catalog backend.
//!
//! This crate defines the JSON shapes exchanged with the backend:
//! - the response envelope wrapping every phase-one and metadata call
//! - phase-one query bodies (nearby places, catalog datasets)
//! - phase-two stream payloads
//! - catalog/layer card metadata and reference data for the pickers
//! - GeoJSON-shaped map data
//!
//! The types are transport-agnostic; the `fetch` crate moves them over
//! HTTP and WebSocket.

pub mod cards;
pub mod config;
pub mod envelope;
pub mod geo;
pub mod query;
pub mod reference;
pub mod save;
pub mod stream;

pub use cards::*;
pub use config::*;
pub use envelope::*;
pub use geo::*;
pub use query::*;
pub use reference::*;
pub use save::*;
pub use stream::*;
