//! Database model for job control records.

use chrono::SecondsFormat;
use diesel::prelude::*;
use finsync_core::control::ControlRecord;

use crate::errors::StorageError;
use crate::utils::parse_timestamp;

/// Control record row.
///
/// `recorded_at` is a fixed-width UTC RFC 3339 string so that text ordering
/// matches time ordering.
#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::control_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ControlRecordDB {
    pub id: String,
    pub job_type: String,
    pub recorded_at: String,
    pub status: String,
    pub message: Option<String>,
}

pub(crate) fn enum_to_text<T: serde::Serialize>(value: &T) -> Result<String, StorageError> {
    Ok(serde_json::to_string(value)?.trim_matches('"').to_string())
}

fn enum_from_text<T: serde::de::DeserializeOwned>(value: &str) -> Result<T, StorageError> {
    Ok(serde_json::from_str(&format!("\"{}\"", value))?)
}

impl TryFrom<&ControlRecord> for ControlRecordDB {
    type Error = StorageError;

    fn try_from(record: &ControlRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id.clone(),
            job_type: enum_to_text(&record.job_type)?,
            recorded_at: record
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Micros, true),
            status: enum_to_text(&record.status)?,
            message: record.message.clone(),
        })
    }
}

impl TryFrom<ControlRecordDB> for ControlRecord {
    type Error = StorageError;

    fn try_from(db: ControlRecordDB) -> Result<Self, Self::Error> {
        Ok(ControlRecord {
            job_type: enum_from_text(&db.job_type)?,
            timestamp: parse_timestamp(&db.recorded_at)?,
            status: enum_from_text(&db.status)?,
            id: db.id,
            message: db.message,
        })
    }
}
