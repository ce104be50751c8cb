use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use finsync_core::statements::{FinancialStatement, StatementKind, StatementStore};
use finsync_core::Result;

use super::model::FinancialStatementDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::financial_statements;
use crate::utils::{chunk_for_sqlite, format_date};

pub struct StatementRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl StatementRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl StatementStore for StatementRepository {
    fn find_statements_by_ticker(
        &self,
        kind: StatementKind,
        ticker: &str,
    ) -> Result<Vec<FinancialStatement>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = financial_statements::table
            .filter(financial_statements::ticker.eq(ticker))
            .filter(financial_statements::kind.eq(kind.as_str()))
            .order((
                financial_statements::end_date.asc(),
                financial_statements::period.asc(),
            ))
            .select(FinancialStatementDB::as_select())
            .load::<FinancialStatementDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(rows
            .into_iter()
            .map(FinancialStatement::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Inserts statements; rows whose (ticker, kind, end_date, period) is
    /// already stored are skipped. Returns the number of inserted rows.
    async fn save_statements(&self, statements: Vec<FinancialStatement>) -> Result<usize> {
        if statements.is_empty() {
            return Ok(0);
        }
        let now = Utc::now();
        let rows = statements
            .iter()
            .map(|statement| FinancialStatementDB::from_domain(statement, now))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut inserted = 0;
                for row in &rows {
                    inserted += diesel::insert_into(financial_statements::table)
                        .values(row)
                        .on_conflict_do_nothing()
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                if inserted < rows.len() {
                    debug!(
                        "Skipped {} statements already stored",
                        rows.len() - inserted
                    );
                }
                Ok(inserted)
            })
            .await
    }

    /// Deletes by id; statements without an id are matched on their natural key.
    async fn delete_statements(&self, statements: Vec<FinancialStatement>) -> Result<usize> {
        if statements.is_empty() {
            return Ok(0);
        }
        let (with_id, without_id): (Vec<_>, Vec<_>) =
            statements.into_iter().partition(|s| s.id.is_some());
        let ids: Vec<String> = with_id.into_iter().filter_map(|s| s.id).collect();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut deleted = 0;
                for chunk in chunk_for_sqlite(&ids) {
                    deleted += diesel::delete(
                        financial_statements::table.filter(financial_statements::id.eq_any(chunk)),
                    )
                    .execute(conn)
                    .map_err(StorageError::from)?;
                }
                for statement in &without_id {
                    deleted += diesel::delete(
                        financial_statements::table
                            .filter(financial_statements::ticker.eq(&statement.ticker))
                            .filter(financial_statements::kind.eq(statement.kind.as_str()))
                            .filter(
                                financial_statements::end_date.eq(format_date(statement.end_date)),
                            )
                            .filter(financial_statements::period.eq(statement.period.as_str())),
                    )
                    .execute(conn)
                    .map_err(StorageError::from)?;
                }
                Ok(deleted)
            })
            .await
    }
}
