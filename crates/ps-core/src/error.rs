//! Engine error type.
//!
//! Higher crates define their own error enums and wrap `PsError` as one
//! variant via `From`, so configuration failures surface unchanged.

use thiserror::Error;

/// The top-level error type for `ps-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum PsError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for all `ps-*` crates.
pub type PsResult<T> = Result<T, PsError>;
