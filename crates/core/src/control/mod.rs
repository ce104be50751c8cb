//! Control records: the persisted "last successful run" of recurring jobs.

mod control_model;
mod control_traits;

pub use control_model::{ControlRecord, ControlStatus, ControlType};
pub use control_traits::ControlStore;
