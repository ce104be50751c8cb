//! External data collaborators.
//!
//! The concrete client (HTTP, scraping, payload parsing) and the ticker
//! universe loader live outside this crate; the core only depends on the
//! traits defined here.

mod source_errors;
mod source_traits;

pub use source_errors::SourceError;
pub use source_traits::{DataSource, SymbolUniverse};
