//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// The base error type for `fr-core` and a common variant for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("non-finite position ({x}, {y}, {z})")]
    NonFinitePosition { x: f64, y: f64, z: f64 },
}

/// Shorthand result type for all `fr-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
