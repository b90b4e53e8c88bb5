pub mod memory;
pub mod models;
pub mod users;

pub use memory::MemoryUserStore;
pub use models::{UserRecord, UserRow};
pub use users::{SqliteUserStore, UserStore};
