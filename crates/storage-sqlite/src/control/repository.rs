use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use finsync_core::control::{ControlRecord, ControlStatus, ControlStore, ControlType};
use finsync_core::Result;

use super::model::{enum_to_text, ControlRecordDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::control_records;

pub struct ControlRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl ControlRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ControlStore for ControlRepository {
    fn find_latest_control(&self, job_type: ControlType) -> Result<Option<ControlRecord>> {
        let mut conn = get_connection(&self.pool)?;
        let row = control_records::table
            .filter(control_records::job_type.eq(enum_to_text(&job_type)?))
            .filter(control_records::status.eq(enum_to_text(&ControlStatus::Success)?))
            .order(control_records::recorded_at.desc())
            .select(ControlRecordDB::as_select())
            .first::<ControlRecordDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        Ok(row.map(ControlRecord::try_from).transpose()?)
    }

    async fn save_control(&self, record: ControlRecord) -> Result<ControlRecord> {
        let row = ControlRecordDB::try_from(&record)?;

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_into(control_records::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    async fn create_test_repository() -> (ControlRepository, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db").to_string_lossy().to_string();
        let pool = create_pool(&db_path).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());
        (ControlRepository::new(pool, writer), temp_dir)
    }

    #[tokio::test]
    async fn test_no_record_yet() {
        let (repo, _dir) = create_test_repository().await;
        assert!(repo
            .find_latest_control(ControlType::CalendarRefresh)
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_latest_success_wins_over_newer_failure() {
        let (repo, _dir) = create_test_repository().await;
        let older = ControlRecord::success(
            ControlType::CalendarRefresh,
            Utc.with_ymd_and_hms(2024, 4, 23, 6, 0, 0).unwrap(),
            "loaded earnings calendars",
        );
        let newer = ControlRecord::success(
            ControlType::CalendarRefresh,
            Utc.with_ymd_and_hms(2024, 4, 24, 6, 0, 0).unwrap(),
            "loaded earnings calendars",
        );
        let mut failed = ControlRecord::success(
            ControlType::CalendarRefresh,
            Utc.with_ymd_and_hms(2024, 4, 25, 6, 0, 0).unwrap(),
            "source unavailable",
        );
        failed.status = ControlStatus::Failed;

        repo.save_control(newer.clone()).await.unwrap();
        repo.save_control(older).await.unwrap();
        repo.save_control(failed).await.unwrap();

        let latest = repo
            .find_latest_control(ControlType::CalendarRefresh)
            .unwrap()
            .unwrap();
        assert_eq!(latest, newer);
    }
}
