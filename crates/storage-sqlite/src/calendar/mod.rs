mod model;
mod repository;

pub use model::EarningsCalendarDB;
pub use repository::CalendarRepository;
