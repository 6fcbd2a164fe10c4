//! Core library for the famcal household calendar.
//!
//! This crate provides everything the CLI builds on:
//! - `event`: the `Event` model and its enums
//! - `import`: the `.ics`/`.csv` parsers and the import coordinator
//! - `sync`: the optimistic sync controller over the local event cache
//! - `store`: the HTTP client for the event store's REST API
//! - `feed`: the read-only external feed client

pub mod config;
pub mod error;
pub mod event;
pub mod feed;
pub mod ids;
pub mod import;
pub mod store;
pub mod sync;

// Re-export the everyday types at crate root for convenience
pub use error::{FamCalError, FamCalResult};
pub use event::*;
