//! Read-only helpers: zone listing, point classification, box size report,
//! and place geocoding.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;

use nse_core::{AreaClass, BBox, GeoPoint, NseLevel};
use nse_output::{BoxRecord, BoxReport, PlaceBoxRecord, SubBoxRecord, write_json};
use nse_spatial::{GeocodeConfig, Geocoder};
use nse_zones::{load_named_boxes, load_places};

use crate::GlobalArgs;

// ── zones ─────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct ZonesArgs {
    /// Show one district's zones and label shares
    district: Option<String>,
}

fn print_distribution(title: &str, dist: &std::collections::BTreeMap<NseLevel, f64>) {
    let shares: Vec<String> = dist.iter().map(|(l, s)| format!("{l} {:.0}%", s * 100.0)).collect();
    println!("  {title:<6} {}", shares.join(", "));
}

pub fn zones(global: &GlobalArgs, args: &ZonesArgs) -> Result<()> {
    let registry = global.load_registry()?;

    let Some(name) = &args.district else {
        println!("{:<28} {:>5}  labels", "district", "zones");
        for d in registry.districts() {
            let dist = registry.distribution(&d.name);
            let labels: Vec<&str> = dist.keys().map(|l| l.label()).collect();
            println!("{:<28} {:>5}  {}", d.name, d.zones.len(), labels.join(", "));
        }
        println!("\n{} districts, {} zones", registry.district_count(), registry.zone_count());
        return Ok(());
    };

    let zones = registry.zones_of(name);
    if zones.is_empty() {
        bail!("unknown district {name:?}");
    }
    println!("{name}:");
    for z in zones {
        println!("  {:<6} {:<11} {}  ({:.2} km²)", z.id, z.level, z.bbox, z.bbox.area_km2());
    }
    print_distribution("count", &registry.distribution(name));
    print_distribution("area", &registry.area_distribution(name));
    Ok(())
}

// ── classify ──────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Latitude, decimal degrees
    #[arg(allow_hyphen_values = true, required_unless_present = "centers")]
    lat: Option<f64>,

    /// Longitude, decimal degrees
    #[arg(allow_hyphen_values = true, required_unless_present = "centers")]
    lon: Option<f64>,

    /// Classify every zone's center instead, flagging centers claimed by an
    /// earlier zone
    #[arg(long)]
    centers: bool,
}

pub fn classify(global: &GlobalArgs, args: &ClassifyArgs) -> Result<()> {
    let registry = global.load_registry()?;

    if args.centers {
        let mut shadowed = 0;
        for (district, zone) in registry.zones() {
            let c = zone.bbox.center();
            let Some(hit) = registry.classify(c) else {
                bail!("center of {} {} is unclassified", district.name, zone.id);
            };
            let mark = if hit.zone == zone.id {
                "ok"
            } else {
                shadowed += 1;
                "shadowed"
            };
            println!(
                "{:<28} {:<6} {:<11} {c}  -> {} {} {}  {mark}",
                district.name, zone.id, zone.level, hit.district, hit.zone, hit.level
            );
        }
        println!("\n{} zones, {shadowed} centers claimed by an earlier zone", registry.zone_count());
        return Ok(());
    }

    let (Some(lat), Some(lon)) = (args.lat, args.lon) else {
        bail!("LAT and LON are required");
    };
    let p = GeoPoint::new(lat, lon);
    match registry.classify(p) {
        Some(hit) => println!("{p}: {} ({}), zone {}", hit.district, hit.level, hit.zone),
        None => println!("{p}: unclassified"),
    }
    Ok(())
}

// ── bbox-check ────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct BboxCheckArgs {
    /// Named boxes CSV (name,lat_min,lat_max,lon_min,lon_max)
    #[arg(long, default_value = "data/province_boxes.csv")]
    boxes: PathBuf,
}

pub fn bbox_check(args: &BboxCheckArgs) -> Result<()> {
    let boxes = load_named_boxes(&args.boxes)
        .with_context(|| format!("loading {}", args.boxes.display()))?;

    let mut rows: Vec<(&str, f64, AreaClass)> = boxes
        .iter()
        .map(|b| {
            let area = b.bbox.area_km2();
            (b.name.as_str(), area, AreaClass::from_area(area))
        })
        .collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));

    println!("{:<50} {:>12}", "box", "area (km²)");
    println!("{}", "=".repeat(80));
    for (name, area, class) in &rows {
        println!("{name:<50} {area:>12.2}    {class}");
    }

    let count = |c: AreaClass| rows.iter().filter(|r| r.2 == c).count();
    println!("\n{}", "=".repeat(80));
    println!("too large (> 200 km²): {}", count(AreaClass::TooLarge));
    println!("large (50-200 km²):    {}", count(AreaClass::Large));
    println!("ok (<= 50 km²):        {}", count(AreaClass::Ok));
    if count(AreaClass::TooLarge) > 0 {
        println!("\nBoxes over 200 km² take a long time to download; split them below 50 km².");
    }
    Ok(())
}

// ── geocode ───────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct GeocodeArgs {
    /// Places CSV (city,label,place)
    #[arg(long, default_value = "data/province_places.csv")]
    places: PathBuf,

    /// Split each box into an N × N grid
    #[arg(long, default_value_t = 2)]
    grid: usize,

    #[arg(short, long, default_value = "bounding_boxes.json")]
    output: PathBuf,

    /// Nominatim search endpoint
    #[arg(long, default_value = "https://nominatim.openstreetmap.org/search")]
    nominatim_url: String,
}

fn subdivisions(bbox: &BBox, n: usize) -> Vec<SubBoxRecord> {
    bbox.subdivide(n)
        .iter()
        .enumerate()
        .map(|(i, b)| SubBoxRecord { zone: format!("Zone_{}{}", i / n + 1, i % n + 1), bbox: b.into() })
        .collect()
}

fn print_box(b: &BoxRecord) -> String {
    format!("[{:.6}, {:.6}, {:.6}, {:.6}]", b.lat_min, b.lat_max, b.lon_min, b.lon_max)
}

pub fn geocode(args: &GeocodeArgs) -> Result<()> {
    let places = load_places(&args.places)
        .with_context(|| format!("loading {}", args.places.display()))?;
    let geocoder = Geocoder::new(GeocodeConfig {
        base_url: args.nominatim_url.clone(),
        ..GeocodeConfig::default()
    })?;

    let mut report = BoxReport::default();
    for entry in &places {
        let record = match geocoder.geocode(&entry.place) {
            Ok(found) => {
                let bbox: BoxRecord = (&found.bbox).into();
                log::info!("[{}] {}: {}", entry.level, entry.place, print_box(&bbox));
                Some(PlaceBoxRecord {
                    place:        entry.place.clone(),
                    bbox,
                    center_lat:   found.center.lat,
                    center_lon:   found.center.lon,
                    display_name: found.display_name,
                    subdivisions: subdivisions(&found.bbox, args.grid),
                })
            }
            Err(e) => {
                log::warn!("[{}] {}: {e}", entry.level, entry.place);
                None
            }
        };
        report.insert(&entry.city, entry.level, record);
    }

    write_json(&args.output, &report)?;
    log::info!("wrote {}", args.output.display());

    // Two sub-boxes per place, from opposite corners.
    println!("\nProposed sub-areas ({} per place):", if args.grid > 1 { 2 } else { 1 });
    for (city, entries) in &report.cities {
        println!("\n{city}:");
        for (level, record) in entries {
            let Some(r) = record else { continue };
            let short = r.place.split(',').next().unwrap_or(&r.place);
            println!("  {level} - {short}:");
            let picks = match (r.subdivisions.first(), r.subdivisions.last()) {
                (Some(a), Some(b)) if r.subdivisions.len() > 1 => vec![a, b],
                (Some(a), _) => vec![a],
                _ => Vec::new(),
            };
            for (i, s) in picks.iter().enumerate() {
                println!("    {} ({}): {}", i + 1, s.zone, print_box(&s.bbox));
            }
        }
    }
    Ok(())
}
