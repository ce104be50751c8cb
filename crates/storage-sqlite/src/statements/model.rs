//! Database models for financial statements.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use finsync_core::statements::{FinancialStatement, LineItems};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::StorageError;
use crate::utils::{format_date, parse_date};

/// Database model for financial statements.
///
/// Line items are stored as a JSON object of decimal strings so no precision
/// is lost to floating point.
#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::financial_statements)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FinancialStatementDB {
    pub id: String,
    pub ticker: String,
    pub kind: String,
    pub period: String,
    pub end_date: String,
    pub release_date: Option<String>,
    pub line_items: String,
    pub created_at: String,
}

impl FinancialStatementDB {
    /// Builds a row, assigning a new id to statements that have none.
    pub fn from_domain(
        statement: &FinancialStatement,
        created_at: DateTime<Utc>,
    ) -> Result<Self, StorageError> {
        let line_items: BTreeMap<&str, String> = statement
            .line_items
            .iter()
            .map(|(name, value)| (name.as_str(), value.to_string()))
            .collect();

        Ok(Self {
            id: statement
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            ticker: statement.ticker.clone(),
            kind: statement.kind.as_str().to_string(),
            period: statement.period.as_str().to_string(),
            end_date: format_date(statement.end_date),
            release_date: statement.release_date.map(format_date),
            line_items: serde_json::to_string(&line_items)?,
            created_at: created_at.to_rfc3339(),
        })
    }
}

impl TryFrom<FinancialStatementDB> for FinancialStatement {
    type Error = StorageError;

    fn try_from(db: FinancialStatementDB) -> Result<Self, Self::Error> {
        let raw_items: BTreeMap<String, String> = serde_json::from_str(&db.line_items)?;
        let line_items = raw_items
            .into_iter()
            .map(|(name, value)| {
                Decimal::from_str(&value)
                    .map(|decimal| (name, decimal))
                    .map_err(|e| {
                        StorageError::SerializationError(format!(
                            "statement {} line item '{}': {}",
                            db.id, value, e
                        ))
                    })
            })
            .collect::<Result<LineItems, _>>()?;

        Ok(FinancialStatement {
            kind: db.kind.parse().map_err(StorageError::from)?,
            period: db.period.parse().map_err(StorageError::from)?,
            end_date: parse_date(&db.end_date)?,
            release_date: db.release_date.as_deref().map(parse_date).transpose()?,
            id: Some(db.id),
            ticker: db.ticker,
            line_items,
        })
    }
}
