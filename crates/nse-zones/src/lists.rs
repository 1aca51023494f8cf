//! Auxiliary CSV lists used by the registry-building tools.
//!
//! ```csv
//! name,lat_min,lat_max,lon_min,lon_max
//! Arequipa - Alto - Cayma Norte,-16.393344,-16.278875,-71.556694,-71.447529
//! ```
//!
//! ```csv
//! city,label,place
//! Arequipa,Alto,"Cayma, Arequipa, Peru"
//! ```
//!
//! Unlike the zone registry these lists are small and hand-edited for a
//! single run, so any bad row fails the whole load.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use nse_core::{BBox, NseLevel};

use crate::{ZoneError, ZoneResult};

/// A bounding box with a free-text name, e.g. a candidate urbanization.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedBox {
    pub name: String,
    pub bbox: BBox,
}

/// A place name to be geocoded, tagged with its city and NSE label.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaceEntry {
    pub city:  String,
    pub level: NseLevel,
    pub place: String,
}

#[derive(Deserialize)]
struct BoxRecord {
    name:    String,
    lat_min: f64,
    lat_max: f64,
    lon_min: f64,
    lon_max: f64,
}

#[derive(Deserialize)]
struct PlaceRecord {
    city:  String,
    label: String,
    place: String,
}

pub fn load_named_boxes(path: &Path) -> ZoneResult<Vec<NamedBox>> {
    load_named_boxes_reader(std::fs::File::open(path)?)
}

pub fn load_named_boxes_reader<R: Read>(reader: R) -> ZoneResult<Vec<NamedBox>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut out = Vec::new();
    for (i, result) in csv_reader.deserialize::<BoxRecord>().enumerate() {
        let r = result.map_err(|e| ZoneError::Parse(e.to_string()))?;
        let bbox = BBox::new(r.lat_min, r.lat_max, r.lon_min, r.lon_max)
            .map_err(|source| ZoneError::Invalid { line: i as u64 + 2, source })?;
        out.push(NamedBox { name: r.name, bbox });
    }
    Ok(out)
}

pub fn load_places(path: &Path) -> ZoneResult<Vec<PlaceEntry>> {
    load_places_reader(std::fs::File::open(path)?)
}

pub fn load_places_reader<R: Read>(reader: R) -> ZoneResult<Vec<PlaceEntry>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut out = Vec::new();
    for (i, result) in csv_reader.deserialize::<PlaceRecord>().enumerate() {
        let r = result.map_err(|e| ZoneError::Parse(e.to_string()))?;
        let level = r
            .label
            .parse::<NseLevel>()
            .map_err(|source| ZoneError::Invalid { line: i as u64 + 2, source })?;
        out.push(PlaceEntry { city: r.city, level, place: r.place });
    }
    Ok(out)
}
