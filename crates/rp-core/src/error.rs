//! Workspace base error type.
//!
//! Sub-crates define their own error enums; `CoreError` covers what lives
//! in this crate, which today is configuration validation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `rp-core`.
pub type CoreResult<T> = Result<T, CoreError>;
