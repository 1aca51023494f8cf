use std::path::PathBuf;

use thiserror::Error;

use nse_output::OutputError;

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed model response: {0}")]
    Model(String),

    #[error("model returned {got} values per image, expected {expected}")]
    Dimension { expected: usize, got: usize },

    #[error("model returned {got} embeddings for a batch of {expected}")]
    BatchSize { expected: usize, got: usize },

    #[error("no category folders under {0}")]
    NoCategories(PathBuf),

    #[error(transparent)]
    Output(#[from] OutputError),
}

pub type FeatureResult<T> = Result<T, FeatureError>;
