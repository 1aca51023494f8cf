//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// The error type for `nse-core` validation and a common base for sub-crates.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("bounding box has a non-finite coordinate")]
    NonFinite,

    #[error("inverted or degenerate {axis} bounds: min {min} must be < max {max}")]
    Inverted {
        axis: &'static str,
        min:  f64,
        max:  f64,
    },

    #[error("{axis} {value} is outside [{lo}, {hi}]")]
    OutOfRange {
        axis:  &'static str,
        value: f64,
        lo:    f64,
        hi:    f64,
    },

    #[error("unknown NSE label {0:?}")]
    UnknownLevel(String),
}

/// Shorthand result type for `nse-core`.
pub type CoreResult<T> = Result<T, CoreError>;
