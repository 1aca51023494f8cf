//! OSM PBF extract provider, enabled with the `osm` Cargo feature.
//!
//! ```ignore
//! use nse_spatial::osm::PbfProvider;
//!
//! let provider = PbfProvider::new("peru-latest.osm.pbf");
//! let graph = provider.fetch(&GraphQuery::BBox(lima), NetworkType::Drive)?;
//! ```
//!
//! Every fetch rescans the file: one pass collects the ways accepted by the
//! network filter and the positions of all nodes, then the referenced nodes
//! inside the requested box are kept.  Wrap the provider in a
//! [`GraphCache`](crate::GraphCache) to avoid repeated scans.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use osmpbf::{Element, ElementReader};

use nse_core::GeoPoint;

use crate::overpass::resolve_query;
use crate::{
    Geocoder, GraphProvider, GraphQuery, NetworkType, SpatialError, SpatialResult, StreetGraph,
    StreetGraphBuilder,
};

pub struct PbfProvider {
    path:     PathBuf,
    geocoder: Option<Arc<Geocoder>>,
}

impl PbfProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), geocoder: None }
    }

    pub fn with_geocoder(mut self, geocoder: Arc<Geocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }
}

impl GraphProvider for PbfProvider {
    fn fetch(&self, query: &GraphQuery, network: NetworkType) -> SpatialResult<StreetGraph> {
        let bbox = resolve_query(query, self.geocoder.as_deref())?;
        let reader =
            ElementReader::from_path(&self.path).map_err(|e| SpatialError::Osm(e.to_string()))?;

        let mut positions: HashMap<i64, GeoPoint> = HashMap::new();
        let mut way_nodes: HashSet<i64> = HashSet::new();

        reader
            .for_each(|elem| match elem {
                Element::Node(n) => {
                    positions.insert(n.id(), GeoPoint::new(n.lat(), n.lon()));
                }
                Element::DenseNode(n) => {
                    positions.insert(n.id(), GeoPoint::new(n.lat(), n.lon()));
                }
                Element::Way(w) => {
                    let tags: Vec<(&str, &str)> = w.tags().collect();
                    if network.accepts(&tags) {
                        way_nodes.extend(w.refs());
                    }
                }
                _ => {}
            })
            .map_err(|e| SpatialError::Osm(e.to_string()))?;

        // Sort OSM ids so NodeIds do not depend on HashSet iteration order.
        let mut ids: Vec<i64> = way_nodes.into_iter().collect();
        ids.sort_unstable();

        let mut builder = StreetGraphBuilder::new();
        for id in ids {
            if let Some(&pos) = positions.get(&id) {
                if bbox.contains(pos) {
                    builder.add_node(pos);
                }
            }
        }

        if builder.node_count() == 0 {
            return Err(SpatialError::NoNodes(query.to_string()));
        }
        log::info!(
            "loaded {} {network} nodes for {query} from {}",
            builder.node_count(),
            self.path.display()
        );
        Ok(builder.build())
    }
}
