//! `nse-spatial`: street-network point clouds and where they come from.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`graph`]    | `StreetGraph` (node positions + R-tree), `StreetGraphBuilder` |
//! | [`network`]  | `NetworkType` (drive / walk) and its OSM tag filters        |
//! | [`provider`] | `GraphProvider` trait, `GraphQuery` (bbox or place name)    |
//! | [`overpass`] | `OverpassProvider`, query builder, response parser          |
//! | [`geocode`]  | `Geocoder` (Nominatim, self-throttled), `GeocodedPlace`     |
//! | [`cache`]    | `GraphCache`: once-only lazy fetch per network type         |
//! | [`osm`]      | `PbfProvider` (feature = `"osm"` only)                      |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag  | Effect                                                         |
//! |-------|----------------------------------------------------------------|
//! | `osm` | Enables reading local OSM PBF extracts via the `osmpbf` crate. |

pub mod cache;
pub mod error;
pub mod geocode;
pub mod graph;
pub mod network;
pub mod overpass;
pub mod provider;

#[cfg(feature = "osm")]
pub mod osm;


pub use cache::GraphCache;
pub use error::{SpatialError, SpatialResult};
pub use geocode::{GeocodeConfig, GeocodedPlace, Geocoder};
pub use graph::{StreetGraph, StreetGraphBuilder};
pub use network::NetworkType;
pub use overpass::{OverpassConfig, OverpassProvider};
pub use provider::{GraphProvider, GraphQuery};
