//! Database model for earnings calendar entries.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use finsync_core::calendar::EarningsCalendarEntry;
use uuid::Uuid;

use crate::errors::StorageError;
use crate::utils::{format_date, parse_date};

#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::earnings_calendar)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EarningsCalendarDB {
    pub id: String,
    pub ticker: String,
    pub announcement_date: String,
    pub statements_loaded: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl EarningsCalendarDB {
    pub fn from_domain(entry: &EarningsCalendarEntry, now: DateTime<Utc>) -> Self {
        let now = now.to_rfc3339();
        Self {
            id: entry
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            ticker: entry.ticker.clone(),
            announcement_date: format_date(entry.announcement_date),
            statements_loaded: entry.statements_loaded,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl TryFrom<EarningsCalendarDB> for EarningsCalendarEntry {
    type Error = StorageError;

    fn try_from(db: EarningsCalendarDB) -> Result<Self, Self::Error> {
        Ok(EarningsCalendarEntry {
            announcement_date: parse_date(&db.announcement_date)?,
            id: Some(db.id),
            ticker: db.ticker,
            statements_loaded: db.statements_loaded,
        })
    }
}
