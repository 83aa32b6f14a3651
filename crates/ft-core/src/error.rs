//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `FtError` as one variant
//! via `From`, so configuration problems surface unchanged at the driver.

use thiserror::Error;

/// The top-level error type for `ft-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum FtError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown {what} name {name:?}")]
    UnknownName { what: &'static str, name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `ft-*` crates.
pub type FtResult<T> = Result<T, FtError>;
