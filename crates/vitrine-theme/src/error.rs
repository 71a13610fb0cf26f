//! Theme error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    #[error("Unknown theme value: {0}")]
    InvalidValue(String),
}
