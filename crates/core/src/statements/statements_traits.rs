use crate::errors::Result;
use crate::statements::statements_model::{FinancialAggregate, FinancialStatement, StatementKind};
use async_trait::async_trait;

/// Persistence of financial statements, keyed by ticker and kind.
#[async_trait]
pub trait StatementStore: Send + Sync {
    fn find_statements_by_ticker(
        &self,
        kind: StatementKind,
        ticker: &str,
    ) -> Result<Vec<FinancialStatement>>;

    /// Saves new statements. Statements without an id receive one.
    async fn save_statements(&self, statements: Vec<FinancialStatement>) -> Result<usize>;

    async fn delete_statements(&self, statements: Vec<FinancialStatement>) -> Result<usize>;
}

/// Keeps one ticker's stored statements in line with the data source.
#[async_trait]
pub trait StatementSynchronizerTrait: Send + Sync {
    async fn synchronize(&self, ticker: &str) -> Result<FinancialAggregate>;

    /// Stored statements of every kind, without touching the data source.
    fn load_stored(&self, ticker: &str) -> Result<FinancialAggregate>;
}
