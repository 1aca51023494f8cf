//! Province targets: named areas sampled independently of the zone registry.
//!
//! Each target is either a bounding box or a place name, tagged with a city
//! and NSE label.  A target gets its own drive-graph fetch and draws its
//! points from every node of that graph.
//!
//! # CSV format
//!
//! ```csv
//! city,label,name,place,lat_min,lat_max,lon_min,lon_max
//! Arequipa,Alto,Cayma_1,"Cayma, Arequipa, Peru",,,,
//! Trujillo,Alto,El_Golf,,-8.130,-8.115,-79.045,-79.025
//! ```
//!
//! A non-empty `place` wins; otherwise all four bounds are required.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use nse_core::{BBox, GeoPoint, NseLevel, SampleRng};
use nse_spatial::{GraphProvider, GraphQuery, NetworkType};

use crate::{SampleError, SampleResult};

/// Points drawn per target unless configured otherwise.
pub const DEFAULT_POINTS_PER_TARGET: usize = 10;

#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    pub city:  String,
    pub level: NseLevel,
    /// Short name used in output filenames.
    pub name:  String,
    pub area:  GraphQuery,
}

#[derive(Deserialize)]
struct TargetRecord {
    city:    String,
    label:   String,
    name:    String,
    place:   Option<String>,
    lat_min: Option<f64>,
    lat_max: Option<f64>,
    lon_min: Option<f64>,
    lon_max: Option<f64>,
}

pub fn load_targets_csv(path: &Path) -> SampleResult<Vec<Target>> {
    load_targets_reader(std::fs::File::open(path)?)
}

pub fn load_targets_reader<R: Read>(reader: R) -> SampleResult<Vec<Target>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut out = Vec::new();

    for (i, result) in csv_reader.deserialize::<TargetRecord>().enumerate() {
        let line = i as u64 + 2;
        let r = result.map_err(|e| SampleError::Parse(e.to_string()))?;
        let invalid = |reason: String| SampleError::InvalidTarget { line, reason };

        let level = r.label.parse::<NseLevel>().map_err(|e| invalid(e.to_string()))?;
        let area = match r.place.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => GraphQuery::Place(p.to_string()),
            _ => match (r.lat_min, r.lat_max, r.lon_min, r.lon_max) {
                (Some(a), Some(b), Some(c), Some(d)) => {
                    GraphQuery::BBox(BBox::new(a, b, c, d).map_err(|e| invalid(e.to_string()))?)
                }
                _ => return Err(invalid(format!("target {:?} has neither place nor bbox", r.name))),
            },
        };
        out.push(Target { city: r.city, level, name: r.name, area });
    }
    Ok(out)
}

/// Group targets by `(city, level)`, groups and members in first-appearance
/// order.  Each group is one unit of parallel work downstream.
pub fn group_targets(targets: &[Target]) -> Vec<((&str, NseLevel), Vec<&Target>)> {
    let mut groups: Vec<((&str, NseLevel), Vec<&Target>)> = Vec::new();
    for t in targets {
        let key = (t.city.as_str(), t.level);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(t),
            None => groups.push((key, vec![t])),
        }
    }
    groups
}

/// Fetch the drive graph for `target` and draw up to `n` distinct nodes.
///
/// Errors from the provider are returned; the caller decides whether to
/// skip the target.
pub fn sample_target(
    provider: &dyn GraphProvider,
    target:   &Target,
    n:        usize,
    rng:      &mut SampleRng,
) -> SampleResult<Vec<GeoPoint>> {
    let graph = provider.fetch(&target.area, NetworkType::Drive)?;
    log::debug!("{}: {} drive nodes, drawing {n}", target.name, graph.node_count());
    Ok(rng.sample_without_replacement(graph.positions(), n))
}
