//! Plain record types written by the output backends.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use nse_core::{BBox, NseLevel};

/// One downloaded image, as listed in `metadata.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Path relative to the dataset root, e.g. `Alto/Alto_0001_20250101_120000_000001.jpg`.
    pub filename:  String,
    pub label:     NseLevel,
    pub lat:       f64,
    pub lon:       f64,
    /// District (Lima) or target name (provinces).
    pub district:  String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city:      Option<String>,
    /// Local download time, `%Y%m%d_%H%M%S_%6f`; also embedded in `filename`.
    pub timestamp: String,
}

/// One row of `y_labels.csv`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelRow {
    pub image_path: String,
    /// Index of `category` among the sorted category folders.
    pub label:      usize,
    pub category:   String,
}

/// A box in `bounding_boxes.json`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoxRecord {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl From<&BBox> for BoxRecord {
    fn from(b: &BBox) -> Self {
        Self { lat_min: b.lat_min(), lat_max: b.lat_max(), lon_min: b.lon_min(), lon_max: b.lon_max() }
    }
}

/// A grid cell of a geocoded place; `zone` is `Zone_<row><col>`, 1-based.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubBoxRecord {
    pub zone: String,
    #[serde(flatten)]
    pub bbox: BoxRecord,
}

/// A geocoded place with its subdivisions.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlaceBoxRecord {
    pub place:          String,
    #[serde(flatten)]
    pub bbox:           BoxRecord,
    pub center_lat:     f64,
    pub center_lon:     f64,
    pub display_name:   String,
    pub subdivisions:   Vec<SubBoxRecord>,
}

/// `city → label → place record` (or `null` when geocoding failed).
///
/// Serializes as nested JSON objects in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoxReport {
    pub cities: Vec<(String, Vec<(NseLevel, Option<PlaceBoxRecord>)>)>,
}

impl BoxReport {
    pub fn insert(&mut self, city: &str, level: NseLevel, record: Option<PlaceBoxRecord>) {
        match self.cities.iter_mut().find(|(c, _)| c == city) {
            Some((_, entries)) => entries.push((level, record)),
            None => self.cities.push((city.to_string(), vec![(level, record)])),
        }
    }
}

struct Ordered<'a, V>(&'a [(NseLevel, V)]);

impl<V: Serialize> Serialize for Ordered<'_, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (level, v) in self.0 {
            map.serialize_entry(level.label(), v)?;
        }
        map.end()
    }
}

impl Serialize for BoxReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cities.len()))?;
        for (city, entries) in &self.cities {
            map.serialize_entry(city, &Ordered(entries))?;
        }
        map.end()
    }
}
