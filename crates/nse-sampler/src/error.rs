use thiserror::Error;

use nse_core::CoreError;
use nse_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("target list parse error: {0}")]
    Parse(String),

    #[error("line {line}: {reason}")]
    InvalidTarget { line: u64, reason: String },

    #[error(transparent)]
    Geometry(#[from] CoreError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SampleResult<T> = Result<T, SampleError>;
