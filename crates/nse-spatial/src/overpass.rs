//! Street graphs from the Overpass API.
//!
//! One request per fetch: every way matching the network filter inside the
//! bounding box, then every node those ways reference.  Place queries are
//! first resolved to the place's bounding box through the [`Geocoder`].
//!
//! All way nodes are returned, not only intersections, so a graph is denser
//! than a simplified routing graph of the same area.

use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;

use nse_core::{BBox, GeoPoint};

use crate::{
    Geocoder, GraphProvider, GraphQuery, NetworkType, SpatialError, SpatialResult, StreetGraph,
    StreetGraphBuilder,
};

#[derive(Clone, Debug)]
pub struct OverpassConfig {
    pub endpoint:   String,
    pub user_agent: String,
    /// Server-side query timeout; the HTTP timeout adds a small margin.
    pub timeout:    Duration,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint:   "https://overpass-api.de/api/interpreter".to_string(),
            user_agent: concat!("rust_nse/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout:    Duration::from_secs(180),
        }
    }
}

/// Blocking Overpass client implementing [`GraphProvider`].
pub struct OverpassProvider {
    client:   Client,
    config:   OverpassConfig,
    geocoder: Option<Arc<Geocoder>>,
}

impl OverpassProvider {
    pub fn new(config: OverpassConfig) -> SpatialResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout + Duration::from_secs(15))
            .build()?;
        Ok(Self { client, config, geocoder: None })
    }

    /// Enable [`GraphQuery::Place`] lookups.
    pub fn with_geocoder(mut self, geocoder: Arc<Geocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }
}

impl GraphProvider for OverpassProvider {
    fn fetch(&self, query: &GraphQuery, network: NetworkType) -> SpatialResult<StreetGraph> {
        let bbox = resolve_query(query, self.geocoder.as_deref())?;
        let ql = build_query(&bbox, network, self.config.timeout.as_secs());
        log::debug!("overpass {network} query for {query}: {ql}");

        let resp = self
            .client
            .post(&self.config.endpoint)
            .form(&[("data", ql.as_str())])
            .send()?;

        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(SpatialError::RateLimited("Overpass"));
        }
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().unwrap_or_default();
            return Err(SpatialError::Status { status, body });
        }

        let graph = parse_response(&resp.text()?)?;
        if graph.is_empty() {
            return Err(SpatialError::NoNodes(query.to_string()));
        }
        log::info!("fetched {} {network} nodes for {query}", graph.node_count());
        Ok(graph)
    }
}

/// Turn a query into the bounding box to fetch.
pub fn resolve_query(query: &GraphQuery, geocoder: Option<&Geocoder>) -> SpatialResult<BBox> {
    match query {
        GraphQuery::BBox(b) => Ok(*b),
        GraphQuery::Place(p) => {
            let geocoder = geocoder.ok_or(SpatialError::NoGeocoder)?;
            Ok(geocoder.geocode(p)?.bbox)
        }
    }
}

/// Overpass QL for all `network` ways in `bbox` plus their nodes.
///
/// Overpass bounding boxes are `(south, west, north, east)`.
pub fn build_query(bbox: &BBox, network: NetworkType, timeout_secs: u64) -> String {
    format!(
        "[out:json][timeout:{timeout_secs}];(way{filter}({s},{w},{n},{e}););node(w);out skel qt;",
        filter = network.overpass_filter(),
        s = bbox.lat_min(),
        w = bbox.lon_min(),
        n = bbox.lat_max(),
        e = bbox.lon_max(),
    )
}

// ── Response parsing ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
    /// Set by the server on runtime errors (timeouts, memory limits).
    remark:   Option<String>,
}

#[derive(Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,
    lat:  Option<f64>,
    lon:  Option<f64>,
}

/// Build a graph from the `node` elements of an Overpass JSON response.
///
/// A response with a `remark` and no nodes is an error: the server gave up
/// before producing results.
pub fn parse_response(body: &str) -> SpatialResult<StreetGraph> {
    let resp: OverpassResponse =
        serde_json::from_str(body).map_err(|e| SpatialError::Parse(e.to_string()))?;

    let mut builder = StreetGraphBuilder::with_capacity(resp.elements.len());
    for el in resp.elements.iter().filter(|e| e.kind == "node") {
        if let (Some(lat), Some(lon)) = (el.lat, el.lon) {
            builder.add_node(GeoPoint::new(lat, lon));
        }
    }

    if builder.node_count() == 0 {
        if let Some(remark) = resp.remark {
            return Err(SpatialError::Parse(format!("overpass: {remark}")));
        }
    }
    Ok(builder.build())
}
