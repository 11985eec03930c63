// Implementations of the auto-mod storage traits.

pub mod in_memory;
pub mod sqlite_store;
pub mod store_backend;

// Re-export for convenience
pub use in_memory::InMemoryAutoModStore;
pub use sqlite_store::SqliteAutoModStore;
pub use store_backend::AutoModStore;
