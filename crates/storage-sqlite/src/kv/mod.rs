//! SQLite storage implementation for the key-value store.

mod model;
mod repository;

pub use model::KvItemDB;
pub use repository::KeyValueRepository;

// Re-export trait from core for convenience
pub use qrpass_core::storage::KeyValueStoreTrait;
