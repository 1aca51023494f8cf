//! Spatial-subsystem error type.

use thiserror::Error;

use nse_core::CoreError;

/// Errors produced by `nse-spatial`.
///
/// Every variant is recoverable at the unit-of-work level: callers skip the
/// zone, target or district that needed the graph and carry on.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("rate limited by {0}")]
    RateLimited(&'static str),

    #[error("response parse error: {0}")]
    Parse(String),

    #[error("no result for place {0:?}")]
    PlaceNotFound(String),

    #[error("no street nodes returned for {0}")]
    NoNodes(String),

    #[error("place queries need a geocoder")]
    NoGeocoder,

    #[error(transparent)]
    Geometry(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
