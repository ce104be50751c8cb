//! SQLite storage implementation for financial statements.

mod model;
mod repository;

pub use model::FinancialStatementDB;
pub use repository::StatementRepository;
