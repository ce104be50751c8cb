mod model;
mod repository;

pub use model::ControlRecordDB;
pub use repository::ControlRepository;
