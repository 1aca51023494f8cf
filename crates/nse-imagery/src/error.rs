use thiserror::Error;

use nse_output::OutputError;

#[derive(Debug, Error)]
pub enum ImageryError {
    #[error("street-level imagery API key is not set")]
    MissingKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("imagery service returned status {0}")]
    Status(u16),

    #[error("response is not an image (content-type {0:?})")]
    NotImage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Output(#[from] OutputError),
}

pub type ImageryResult<T> = Result<T, ImageryError>;
