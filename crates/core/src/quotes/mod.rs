//! Historical quotes: model, store trait and the catch-up service.
//!
//! ```text
//! QuoteCatchUpService
//!       │
//!       ├─► QuoteStore (latest stored date, persist per ticker)
//!       ├─► SymbolUniverse (tickers to fetch)
//!       └─► DataSource (historical quotes since a date)
//! ```

mod catch_up;
mod model;
mod store;

#[cfg(test)]
mod catch_up_tests;

pub use catch_up::{QuoteCatchUpReport, QuoteCatchUpService};
pub use model::{quote_id, Quote};
pub use store::QuoteStore;
