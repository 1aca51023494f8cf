//! Unit tests for nse-zones.

use nse_core::{BBox, GeoPoint, NseLevel};

use crate::{Registry, RegistryBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn bbox(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> BBox {
    BBox::new(lat_min, lat_max, lon_min, lon_max).unwrap()
}

/// District "X": zone A (0,1,0,1) Alto, zone B (1,2,1,2) Bajo.
fn registry_x() -> Registry {
    let mut b = RegistryBuilder::new();
    b.add_zone("X", bbox(0.0, 1.0, 0.0, 1.0), NseLevel::Alto);
    b.add_zone("X", bbox(1.0, 2.0, 1.0, 2.0), NseLevel::Bajo);
    b.build()
}

// ── Registry queries ──────────────────────────────────────────────────────────

#[cfg(test)]
mod registry {
    use super::*;

    #[test]
    fn districts_keep_first_appearance_order() {
        let mut b = RegistryBuilder::new();
        b.add_zone("B", bbox(0.0, 1.0, 0.0, 1.0), NseLevel::Medio);
        b.add_zone("A", bbox(0.0, 1.0, 0.0, 1.0), NseLevel::Alto);
        b.add_zone("B", bbox(1.0, 2.0, 1.0, 2.0), NseLevel::Bajo);
        let reg = b.build();
        assert_eq!(reg.list_districts(), vec!["B", "A"]);
        assert_eq!(reg.zones_of("B").len(), 2);
        assert_eq!(reg.zone_count(), 3);
    }

    #[test]
    fn district_ids_stop_at_u16_cap() {
        let cell = bbox(0.0, 1.0, 0.0, 1.0);
        let mut b = RegistryBuilder::new();
        for i in 0..u16::MAX {
            assert!(b.add_zone(&format!("D{i}"), cell, NseLevel::Medio).is_valid());
        }
        assert_eq!(b.add_zone("overflow", cell, NseLevel::Medio), nse_core::ZoneId::INVALID);
        // Existing districts still accept zones.
        assert!(b.add_zone("D0", cell, NseLevel::Alto).is_valid());

        let reg = b.build();
        assert_eq!(reg.district_count(), u16::MAX as usize);
        assert_eq!(reg.zone_count(), u16::MAX as usize + 1);
        assert!(reg.zones_of("overflow").is_empty());
    }

    #[test]
    fn zones_of_unknown_is_empty() {
        assert!(registry_x().zones_of("Nowhere").is_empty());
    }

    #[test]
    fn distribution_counts_zones() {
        let mut b = RegistryBuilder::new();
        // One huge Medio zone, one tiny Alto zone: counted equally.
        b.add_zone("D", bbox(0.0, 1.0, 0.0, 1.0), NseLevel::Medio);
        b.add_zone("D", bbox(0.0, 0.01, 0.0, 0.01), NseLevel::Alto);
        b.add_zone("D", bbox(0.5, 0.6, 0.5, 0.6), NseLevel::Medio);
        let reg = b.build();

        let dist = reg.distribution("D");
        assert!((dist[&NseLevel::Medio] - 2.0 / 3.0).abs() < 1e-12);
        assert!((dist[&NseLevel::Alto] - 1.0 / 3.0).abs() < 1e-12);
        assert!(!dist.contains_key(&NseLevel::Bajo));

        let area = reg.area_distribution("D");
        assert!(area[&NseLevel::Medio] > 0.999);
        let total: f64 = area.values().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn distribution_of_unknown_is_empty() {
        assert!(registry_x().distribution("Nowhere").is_empty());
    }

    #[test]
    fn extent_covers_all_zones() {
        let e = registry_x().extent().unwrap();
        assert_eq!((e.lat_min(), e.lat_max(), e.lon_min(), e.lon_max()), (0.0, 2.0, 0.0, 2.0));
        assert!(RegistryBuilder::new().build().extent().is_none());
    }
}

// ── Classifier ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod classify {
    use super::*;

    #[test]
    fn end_to_end_example() {
        let reg = registry_x();

        let a = reg.classify(GeoPoint::new(0.5, 0.5)).unwrap();
        assert_eq!((a.district, a.level), ("X", NseLevel::Alto));

        let b = reg.classify(GeoPoint::new(1.5, 1.5)).unwrap();
        assert_eq!((b.district, b.level), ("X", NseLevel::Bajo));

        assert!(reg.classify(GeoPoint::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn boundaries_are_inclusive() {
        let mut b = RegistryBuilder::new();
        b.add_zone("Z", bbox(-12.2, -12.1, -77.1, -77.0), NseLevel::Medio);
        let reg = b.build();
        for p in [
            GeoPoint::new(-12.2, -77.05),
            GeoPoint::new(-12.1, -77.05),
            GeoPoint::new(-12.15, -77.1),
            GeoPoint::new(-12.15, -77.0),
            GeoPoint::new(-12.2, -77.1),
        ] {
            assert_eq!(reg.classify(p).map(|c| c.level), Some(NseLevel::Medio), "{p}");
        }
    }

    #[test]
    fn shared_corner_goes_to_first_zone() {
        // (1,1) lies on both zone A and zone B; A is declared first.
        let reg = registry_x();
        let hit = reg.classify(GeoPoint::new(1.0, 1.0)).unwrap();
        assert_eq!(hit.level, NseLevel::Alto);
    }

    #[test]
    fn overlap_across_districts_first_district_wins() {
        let mut b = RegistryBuilder::new();
        b.add_zone("First", bbox(0.0, 2.0, 0.0, 2.0), NseLevel::Bajo);
        b.add_zone("Second", bbox(0.5, 1.0, 0.5, 1.0), NseLevel::Alto);
        let reg = b.build();
        assert_eq!(reg.classify(GeoPoint::new(0.75, 0.75)).unwrap().district, "First");
    }

    #[test]
    fn every_lima_zone_center_classifies_to_itself_or_an_earlier_zone() {
        let reg = Registry::lima().unwrap();
        let order: Vec<_> = reg.zones().map(|(_, z)| z.id).collect();
        let pos = |id| order.iter().position(|&z| z == id).unwrap();

        for (district, zone) in reg.zones() {
            let center = zone.bbox.center();
            let hit = reg.classify(center).expect("center of a zone is always inside it");
            if hit.zone == zone.id {
                assert_eq!(hit.district, district.name);
                assert_eq!(hit.level, zone.level);
            } else {
                // Precedence: an overlapping zone declared earlier wins.
                assert!(pos(hit.zone) < pos(zone.id), "{} zone {}", district.name, zone.id);
                let winner = reg.zones().find(|(_, z)| z.id == hit.zone).unwrap().1;
                assert!(winner.bbox.contains(center));
            }
        }
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Write;

    use nse_core::CoreError;

    use crate::{ZoneError, load_registry_csv, load_registry_reader, load_registry_strict_reader};

    use super::*;

    const CSV: &str = "\
district,lat_min,lat_max,lon_min,lon_max,label
A,0.0,1.0,0.0,1.0,Alto
B,0.0,1.0,0.0,1.0,medio_bajo
A,1.0,0.5,0.0,1.0,Bajo
C,0.0,1.0,0.0,1.0,Muy alto
A,1.0,2.0,1.0,2.0,Medio
";

    #[test]
    fn lenient_skips_and_reports() {
        let report = load_registry_reader(CSV.as_bytes()).unwrap();
        let reg = &report.registry;

        assert_eq!(reg.list_districts(), vec!["A", "B"]);
        assert_eq!(reg.zones_of("A").len(), 2);
        assert_eq!(reg.zones_of("B")[0].level, NseLevel::MedioBajo);

        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[0].line, 4);
        assert!(matches!(report.rejected[0].error, CoreError::Inverted { .. }));
        assert_eq!(report.rejected[1].district, "C");
        assert!(matches!(report.rejected[1].error, CoreError::UnknownLevel(_)));
        assert_eq!(report.dropped, vec!["C"]);
    }

    #[test]
    fn dropped_district_listed_once() {
        let csv = "\
district,lat_min,lat_max,lon_min,lon_max,label
D,1,0,0,1,Alto
A,0,1,0,1,Alto
D,0,1,0,1,Nope
";
        let report = load_registry_reader(csv.as_bytes()).unwrap();
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.dropped, vec!["D"]);
    }

    #[test]
    fn strict_fails_on_first_bad_row() {
        let err = load_registry_strict_reader(CSV.as_bytes()).unwrap_err();
        assert!(matches!(err, ZoneError::Invalid { line: 4, .. }));
    }

    #[test]
    fn all_rows_invalid_is_empty_error() {
        let csv = "district,lat_min,lat_max,lon_min,lon_max,label\nA,1,0,0,1,Alto\n";
        assert!(matches!(load_registry_reader(csv.as_bytes()), Err(ZoneError::Empty)));
    }

    #[test]
    fn non_numeric_coordinate_is_parse_error() {
        let csv = "district,lat_min,lat_max,lon_min,lon_max,label\nA,x,1,0,1,Alto\n";
        assert!(matches!(load_registry_reader(csv.as_bytes()), Err(ZoneError::Parse(_))));
    }

    #[test]
    fn load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(CSV.as_bytes()).unwrap();
        let report = load_registry_csv(f.path()).unwrap();
        assert_eq!(report.registry.zone_count(), 3);
    }

    #[test]
    fn bundled_lima_table_is_clean() {
        let report = load_registry_reader(include_str!("../../../data/lima_nse.csv").as_bytes())
            .unwrap();
        assert!(report.rejected.is_empty(), "{:?}", report.rejected);
        assert_eq!(report.registry.district_count(), 40);
        assert_eq!(report.registry.zones_of("San Isidro")[0].level, NseLevel::Alto);
    }
}

// ── Lists ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lists {
    use crate::{ZoneError, load_named_boxes_reader, load_places_reader};

    use super::*;

    #[test]
    fn named_boxes() {
        let csv = "name,lat_min,lat_max,lon_min,lon_max\n\"Trujillo - Alto - Golf\",-8.1,-8.0,-79.1,-79.0\n";
        let boxes = load_named_boxes_reader(csv.as_bytes()).unwrap();
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].name, "Trujillo - Alto - Golf");
    }

    #[test]
    fn named_box_inverted_fails() {
        let csv = "name,lat_min,lat_max,lon_min,lon_max\nbad,-8.0,-8.1,-79.1,-79.0\n";
        assert!(matches!(
            load_named_boxes_reader(csv.as_bytes()),
            Err(ZoneError::Invalid { line: 2, .. })
        ));
    }

    #[test]
    fn places() {
        let csv = "city,label,place\nPiura,Medio alto,\"Castilla, Piura, Peru\"\n";
        let places = load_places_reader(csv.as_bytes()).unwrap();
        assert_eq!(places[0].level, NseLevel::MedioAlto);
        assert_eq!(places[0].place, "Castilla, Piura, Peru");
    }

    #[test]
    fn bundled_lists_parse() {
        let boxes = load_named_boxes_reader(include_str!("../../../data/province_boxes.csv").as_bytes());
        assert!(!boxes.unwrap().is_empty());
        let places = load_places_reader(include_str!("../../../data/province_places.csv").as_bytes());
        assert_eq!(places.unwrap().len(), 9);
    }
}
