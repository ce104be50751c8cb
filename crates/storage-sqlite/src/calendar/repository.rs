use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use diesel::upsert::excluded;
use std::sync::Arc;

use finsync_core::calendar::{CalendarStore, EarningsCalendarEntry};
use finsync_core::Result;

use super::model::EarningsCalendarDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::earnings_calendar;

pub struct CalendarRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CalendarRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CalendarStore for CalendarRepository {
    fn find_all_calendar_entries(&self) -> Result<Vec<EarningsCalendarEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = earnings_calendar::table
            .order((
                earnings_calendar::announcement_date.asc(),
                earnings_calendar::ticker.asc(),
            ))
            .select(EarningsCalendarDB::as_select())
            .load::<EarningsCalendarDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(rows
            .into_iter()
            .map(EarningsCalendarEntry::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?)
    }

    async fn save_calendar_entries(&self, entries: Vec<EarningsCalendarEntry>) -> Result<usize> {
        if entries.is_empty() {
            return Ok(0);
        }
        let now = Utc::now();
        let rows: Vec<EarningsCalendarDB> = entries
            .iter()
            .map(|entry| EarningsCalendarDB::from_domain(entry, now))
            .collect();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut affected = 0;
                for row in &rows {
                    affected += diesel::insert_into(earnings_calendar::table)
                        .values(row)
                        .on_conflict((
                            earnings_calendar::ticker,
                            earnings_calendar::announcement_date,
                        ))
                        .do_update()
                        .set((
                            earnings_calendar::statements_loaded
                                .eq(excluded(earnings_calendar::statements_loaded)),
                            earnings_calendar::updated_at
                                .eq(excluded(earnings_calendar::updated_at)),
                        ))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(affected)
            })
            .await
    }
}
