pub mod metrics;
pub mod progress_store;
pub mod storage;

pub use progress_store::{parse_units, ProgressStore, StoreError};
pub use storage::{MemoryStorage, SqliteStorage, Storage};
