//! Financial statements: domain models, store trait, reconciliation and synchronization.

mod reconciler;
mod statements_model;
mod statements_traits;
mod synchronizer;


pub use reconciler::find_misclassified;
pub use statements_model::{
    ContentKey, FinancialAggregate, FinancialStatement, LineItems, StatementEntry, StatementKind,
    StatementPeriod, StatementSeries,
};
pub use statements_traits::{StatementStore, StatementSynchronizerTrait};
pub use synchronizer::{StatementSynchronizer, SyncReport};
