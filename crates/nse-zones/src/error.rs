use thiserror::Error;

use nse_core::CoreError;

#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("registry parse error: {0}")]
    Parse(String),

    #[error("line {line}: {source}")]
    Invalid {
        line:   u64,
        #[source]
        source: CoreError,
    },

    #[error("line {line}: too many districts or zones for the registry")]
    Capacity { line: u64 },

    #[error("registry contains no valid zones")]
    Empty,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ZoneResult<T> = Result<T, ZoneError>;
