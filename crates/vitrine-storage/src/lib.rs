//! Vitrine Storage Layer
//!
//! Durable per-site key-value preferences backed by SQLite, with an
//! in-memory fallback for sessions where the durable store is missing or
//! starts failing.

mod database;
mod error;
mod memory;
mod migrations;
mod preferences;

pub use database::Database;
pub use error::StorageError;
pub use memory::MemoryStore;
pub use preferences::{PreferenceStore, Preferences};

pub type Result<T> = std::result::Result<T, StorageError>;
