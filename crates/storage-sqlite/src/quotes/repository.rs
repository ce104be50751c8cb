use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::warn;
use std::sync::Arc;

use finsync_core::quotes::{Quote, QuoteStore};
use finsync_core::Result;

use super::model::QuoteDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::quotes::dsl as quotes_dsl;
use crate::utils::{chunk_for_sqlite, parse_date};

pub struct QuoteRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl QuoteRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl QuoteStore for QuoteRepository {
    fn find_all_quotes(&self) -> Result<Vec<Quote>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = quotes_dsl::quotes
            .order((quotes_dsl::ticker.asc(), quotes_dsl::date.asc()))
            .select(QuoteDB::as_select())
            .load::<QuoteDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(rows
            .into_iter()
            .map(Quote::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn latest_quote_date(&self) -> Result<Option<NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;
        let latest: Option<String> = quotes_dsl::quotes
            .select(diesel::dsl::max(quotes_dsl::date))
            .first::<Option<String>>(&mut conn)
            .into_core()?;

        Ok(latest.as_deref().map(parse_date).transpose()?)
    }

    async fn save_quotes(&self, ticker: &str, quotes: Vec<Quote>) -> Result<usize> {
        if quotes.is_empty() {
            return Ok(0);
        }
        let now = Utc::now();
        let rows: Vec<QuoteDB> = quotes
            .iter()
            .filter(|quote| {
                let matches = quote.ticker == ticker;
                if !matches {
                    warn!("Dropping {} quote returned for {}", quote.ticker, ticker);
                }
                matches
            })
            .map(|quote| QuoteDB::from_domain(quote, now))
            .collect();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut saved = 0;
                for chunk in chunk_for_sqlite(&rows) {
                    saved += diesel::replace_into(quotes_dsl::quotes)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(saved)
            })
            .await
    }
}
