//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] vitrine_storage::StorageError),

    #[error("Tab error: {0}")]
    Tab(#[from] vitrine_tabs::TabError),

    #[error("Theme error: {0}")]
    Theme(#[from] vitrine_theme::ThemeError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid page: {0}")]
    Page(String),
}
