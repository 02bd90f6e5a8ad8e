pub mod card;
pub mod course;
pub mod snapshot;

pub use card::CourseCard;
pub use course::{Course, CourseProgress, DailyEntry};
pub use snapshot::ProgressSnapshot;
