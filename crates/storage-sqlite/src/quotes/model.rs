//! Database model for daily quotes.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use finsync_core::quotes::Quote;

use crate::errors::StorageError;
use crate::utils::{format_date, parse_date, parse_decimal};

/// Quote row keyed by `{ticker}_{date}`; prices are decimal text.
#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::quotes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuoteDB {
    pub id: String,
    pub ticker: String,
    pub date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub adj_close: String,
    pub volume: String,
    pub created_at: String,
}

impl QuoteDB {
    pub fn from_domain(quote: &Quote, created_at: DateTime<Utc>) -> Self {
        Self {
            id: quote.id(),
            ticker: quote.ticker.clone(),
            date: format_date(quote.date),
            open: quote.open.to_string(),
            high: quote.high.to_string(),
            low: quote.low.to_string(),
            close: quote.close.to_string(),
            adj_close: quote.adj_close.to_string(),
            volume: quote.volume.to_string(),
            created_at: created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<QuoteDB> for Quote {
    type Error = StorageError;

    fn try_from(db: QuoteDB) -> Result<Self, Self::Error> {
        Ok(Quote {
            date: parse_date(&db.date)?,
            open: parse_decimal(&db.open)?,
            high: parse_decimal(&db.high)?,
            low: parse_decimal(&db.low)?,
            close: parse_decimal(&db.close)?,
            adj_close: parse_decimal(&db.adj_close)?,
            volume: parse_decimal(&db.volume)?,
            ticker: db.ticker,
        })
    }
}
