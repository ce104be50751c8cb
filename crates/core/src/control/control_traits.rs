use crate::control::control_model::{ControlRecord, ControlType};
use crate::errors::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ControlStore: Send + Sync {
    /// Most recent successful record of a job, if any.
    fn find_latest_control(&self, job_type: ControlType) -> Result<Option<ControlRecord>>;

    async fn save_control(&self, record: ControlRecord) -> Result<ControlRecord>;
}
