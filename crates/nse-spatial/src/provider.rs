//! The street-network provider seam.

use std::fmt;
use std::sync::Arc;

use nse_core::BBox;

use crate::{NetworkType, SpatialResult, StreetGraph};

/// What region to fetch a street graph for.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphQuery {
    BBox(BBox),
    /// Free-text place name, e.g. `"Cayma, Arequipa, Peru"`.
    Place(String),
}

impl fmt::Display for GraphQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphQuery::BBox(b)  => write!(f, "bbox {b}"),
            GraphQuery::Place(p) => write!(f, "place {p:?}"),
        }
    }
}

/// Source of street-network node clouds.
///
/// Implementations must be shareable across worker threads.  A fetch may be
/// slow (seconds to minutes) and may fail; callers treat failure as "no
/// graph" for the unit of work that asked.
pub trait GraphProvider: Send + Sync {
    fn fetch(&self, query: &GraphQuery, network: NetworkType) -> SpatialResult<StreetGraph>;
}

impl<P: GraphProvider + ?Sized> GraphProvider for Arc<P> {
    fn fetch(&self, query: &GraphQuery, network: NetworkType) -> SpatialResult<StreetGraph> {
        (**self).fetch(query, network)
    }
}

impl<P: GraphProvider + ?Sized> GraphProvider for &P {
    fn fetch(&self, query: &GraphQuery, network: NetworkType) -> SpatialResult<StreetGraph> {
        (**self).fetch(query, network)
    }
}
