//! CSV registry loader with a validation pass.
//!
//! # CSV format
//!
//! One row per zone.  Rows for the same district need not be adjacent;
//! district order is the order of first appearance, zone order is row order.
//!
//! ```csv
//! district,lat_min,lat_max,lon_min,lon_max,label
//! San Isidro,-12.110,-12.090,-77.050,-77.030,Alto
//! Surquillo,-12.120,-12.105,-77.025,-77.005,Medio alto
//! Surquillo,-12.135,-12.120,-77.015,-76.995,Medio
//! ```
//!
//! `label` is parsed case-insensitively (`Medio alto`, `medio_alto`, ...).
//!
//! # Validation
//!
//! Each row is checked by [`BBox::new`] (finite, in range, `min < max`) and
//! its label parsed.  [`load_registry_csv`] logs and skips rows that fail,
//! reporting them in [`LoadReport::rejected`]; a district whose every row
//! was rejected does not appear in the registry.  [`load_registry_strict`]
//! fails on the first bad row instead.  Rows that are not CSV-parseable at
//! all (missing columns, non-numeric coordinates) are a hard
//! [`ZoneError::Parse`] in both modes.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use nse_core::{BBox, CoreError, NseLevel};

use crate::{Registry, RegistryBuilder, ZoneError, ZoneResult};

/// The bundled Lima zone table.
const LIMA_CSV: &str = include_str!("../../../data/lima_nse.csv");

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ZoneRecord {
    district: String,
    lat_min:  f64,
    lat_max:  f64,
    lon_min:  f64,
    lon_max:  f64,
    label:    String,
}

impl ZoneRecord {
    fn validate(&self) -> Result<(BBox, NseLevel), CoreError> {
        let bbox = BBox::new(self.lat_min, self.lat_max, self.lon_min, self.lon_max)?;
        let level = self.label.parse::<NseLevel>()?;
        Ok((bbox, level))
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// A zone row dropped by the validation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct RejectedZone {
    /// 1-based line number in the source (the header is line 1).
    pub line:     u64,
    pub district: String,
    pub error:    CoreError,
}

/// Output of a lenient load.
#[derive(Debug)]
pub struct LoadReport {
    pub registry: Registry,
    pub rejected: Vec<RejectedZone>,
    /// Districts that had rows but none valid, in name order.
    pub dropped:  Vec<String>,
}

/// Load a registry from a CSV file, skipping invalid zones.
pub fn load_registry_csv(path: &Path) -> ZoneResult<LoadReport> {
    let file = std::fs::File::open(path).map_err(ZoneError::Io)?;
    load_registry_reader(file)
}

/// Like [`load_registry_csv`] but accepts any `Read` source.
pub fn load_registry_reader<R: Read>(reader: R) -> ZoneResult<LoadReport> {
    load(reader, false)
}

/// Load a registry from a CSV file, failing on the first invalid zone.
pub fn load_registry_strict(path: &Path) -> ZoneResult<Registry> {
    let file = std::fs::File::open(path).map_err(ZoneError::Io)?;
    load_registry_strict_reader(file)
}

pub fn load_registry_strict_reader<R: Read>(reader: R) -> ZoneResult<Registry> {
    load(reader, true).map(|r| r.registry)
}

impl Registry {
    /// The bundled Lima Metropolitana registry (`data/lima_nse.csv`).
    pub fn lima() -> ZoneResult<Registry> {
        load_registry_reader(LIMA_CSV.as_bytes()).map(|r| r.registry)
    }
}

// ── Implementation ────────────────────────────────────────────────────────────

fn load<R: Read>(reader: R, strict: bool) -> ZoneResult<LoadReport> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|e| ZoneError::Parse(e.to_string()))?
        .clone();

    let mut builder = RegistryBuilder::new();
    let mut rejected = Vec::new();

    for result in csv_reader.records() {
        let record = result.map_err(|e| ZoneError::Parse(e.to_string()))?;
        let line = record.position().map_or(0, |p| p.line());
        let row: ZoneRecord = record
            .deserialize(Some(&headers))
            .map_err(|e| ZoneError::Parse(format!("line {line}: {e}")))?;

        match row.validate() {
            Ok((bbox, level)) => {
                if !builder.add_zone(row.district.trim(), bbox, level).is_valid() {
                    return Err(ZoneError::Capacity { line });
                }
            }
            Err(source) if strict => return Err(ZoneError::Invalid { line, source }),
            Err(error) => {
                log::warn!("skipping zone of {:?} at line {line}: {error}", row.district);
                rejected.push(RejectedZone { line, district: row.district, error });
            }
        }
    }

    let registry = builder.build();
    if registry.is_empty() {
        return Err(ZoneError::Empty);
    }

    let dropped: Vec<String> = rejected
        .iter()
        .map(|r| r.district.trim())
        .filter(|d| registry.district(d).is_none())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    for d in &dropped {
        log::warn!("district {d:?} has no valid zones; dropped from registry");
    }

    log::debug!(
        "loaded registry: {} districts, {} zones, {} rejected",
        registry.district_count(),
        registry.zone_count(),
        rejected.len()
    );
    Ok(LoadReport { registry, rejected, dropped })
}
