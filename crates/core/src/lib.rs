//! finsync core - domain entities, services, and traits.
//!
//! Keeps stored financial statements and the earnings calendar in line with
//! an external data source. This crate is database-agnostic: it defines the
//! store traits implemented by the `storage-sqlite` crate and the source
//! traits implemented by data clients.

pub mod calendar;
pub mod clock;
pub mod config;
pub mod constants;
pub mod control;
pub mod errors;
pub mod quotes;
pub mod scheduler;
pub mod source;
pub mod statements;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
