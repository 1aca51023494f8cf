//! Unit tests for nse-core primitives.

#[cfg(test)]
mod ids {
    use crate::{NodeId, ZoneId};

    #[test]
    fn index_roundtrip() {
        let id = ZoneId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(ZoneId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinel_is_default() {
        assert_eq!(NodeId::default(), NodeId::INVALID);
        assert_eq!(NodeId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display_is_tagged() {
        assert_eq!(ZoneId(7).to_string(), "z7");
        assert_eq!(NodeId(3).to_string(), "n3");
    }

    #[test]
    fn try_from_rejects_overflow() {
        assert!(crate::DistrictId::try_from(70_000usize).is_err());
        assert!(!NodeId::INVALID.is_valid());
    }
}

#[cfg(test)]
mod bbox {
    use crate::{BBox, CoreError, GeoPoint};

    #[test]
    fn valid_box_accessors() {
        let b = BBox::new(-12.11, -12.09, -77.05, -77.03).unwrap();
        assert_eq!(b.lat_min(), -12.11);
        assert_eq!(b.lon_max(), -77.03);
    }

    #[test]
    fn inverted_latitude_rejected() {
        let err = BBox::new(-12.09, -12.11, -77.05, -77.03).unwrap_err();
        assert!(matches!(err, CoreError::Inverted { axis: "latitude", .. }));
    }

    #[test]
    fn degenerate_longitude_rejected() {
        let err = BBox::new(0.0, 1.0, 2.0, 2.0).unwrap_err();
        assert!(matches!(err, CoreError::Inverted { axis: "longitude", .. }));
    }

    #[test]
    fn non_finite_rejected() {
        assert_eq!(BBox::new(f64::NAN, 1.0, 0.0, 1.0).unwrap_err(), CoreError::NonFinite);
        assert_eq!(BBox::new(0.0, f64::INFINITY, 0.0, 1.0).unwrap_err(), CoreError::NonFinite);
    }

    #[test]
    fn out_of_range_rejected() {
        let err = BBox::new(0.0, 91.0, 0.0, 1.0).unwrap_err();
        assert!(matches!(err, CoreError::OutOfRange { axis: "latitude", .. }));
    }

    #[test]
    fn contains_is_closed_on_every_edge() {
        let b = BBox::new(0.0, 1.0, 0.0, 1.0).unwrap();
        for p in [
            GeoPoint::new(0.0, 0.5),
            GeoPoint::new(1.0, 0.5),
            GeoPoint::new(0.5, 0.0),
            GeoPoint::new(0.5, 1.0),
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 1.0),
        ] {
            assert!(b.contains(p), "{p} should be inside");
        }
        assert!(!b.contains(GeoPoint::new(1.000_001, 0.5)));
        assert!(!b.contains(GeoPoint::new(0.5, -0.000_001)));
    }

    #[test]
    fn center_and_union() {
        let a = BBox::new(0.0, 1.0, 0.0, 1.0).unwrap();
        let b = BBox::new(1.0, 2.0, 1.0, 2.0).unwrap();
        assert_eq!(a.center(), GeoPoint::new(0.5, 0.5));
        let u = a.union(&b);
        assert_eq!((u.lat_min(), u.lat_max(), u.lon_min(), u.lon_max()), (0.0, 2.0, 0.0, 2.0));
    }

    #[test]
    fn subdivide_covers_parent() {
        let b = BBox::new(-16.45, -16.41, -71.55, -71.50).unwrap();
        let subs = b.subdivide(2);
        assert_eq!(subs.len(), 4);
        assert_eq!(subs[0].lat_min(), b.lat_min());
        assert_eq!(subs[0].lon_min(), b.lon_min());
        assert_eq!(subs[3].lat_max(), b.lat_max());
        assert_eq!(subs[3].lon_max(), b.lon_max());
        let total: f64 = subs.iter().map(|s| s.area_km2()).sum();
        assert!((total - b.area_km2()).abs() / b.area_km2() < 1e-3);
        assert!(b.subdivide(0).is_empty());
    }
}

#[cfg(test)]
mod area {
    use crate::{AreaClass, BBox, approx_area_km2};

    #[test]
    fn one_degree_at_equator() {
        let b = BBox::new(-0.5, 0.5, 0.0, 1.0).unwrap();
        let a = approx_area_km2(&b);
        assert!((a - 111.0 * 111.0).abs() < 1.0, "got {a}");
    }

    #[test]
    fn doubling_lat_span_roughly_doubles_area() {
        // Lima latitude band; the cosine correction moves a little because
        // the mean latitude shifts when the box grows northward.
        let small = BBox::new(-12.10, -12.05, -77.05, -77.00).unwrap();
        let tall  = BBox::new(-12.10, -12.00, -77.05, -77.00).unwrap();
        let ratio = approx_area_km2(&tall) / approx_area_km2(&small);
        assert!((ratio - 2.0).abs() < 0.01, "ratio {ratio}");
    }

    #[test]
    fn cosine_shrinks_width_away_from_equator() {
        let eq   = BBox::new(-0.05, 0.05, 0.0, 0.1).unwrap();
        let high = BBox::new(59.95, 60.05, 0.0, 0.1).unwrap();
        let ratio = approx_area_km2(&high) / approx_area_km2(&eq);
        assert!((ratio - 0.5).abs() < 0.01, "ratio {ratio}");
    }

    #[test]
    fn classification_thresholds() {
        assert_eq!(AreaClass::from_area(10.0), AreaClass::Ok);
        assert_eq!(AreaClass::from_area(50.0), AreaClass::Ok);
        assert_eq!(AreaClass::from_area(50.01), AreaClass::Large);
        assert_eq!(AreaClass::from_area(200.0), AreaClass::Large);
        assert_eq!(AreaClass::from_area(200.01), AreaClass::TooLarge);
    }

    #[test]
    fn small_lima_zone_is_ok() {
        let san_isidro = BBox::new(-12.110, -12.090, -77.050, -77.030).unwrap();
        assert_eq!(AreaClass::of(&san_isidro), AreaClass::Ok);
    }
}

#[cfg(test)]
mod nse {
    use crate::NseLevel;

    #[test]
    fn labels_roundtrip() {
        for level in NseLevel::ALL {
            assert_eq!(level.label().parse::<NseLevel>().unwrap(), level);
        }
    }

    #[test]
    fn lenient_parsing() {
        assert_eq!(" medio ALTO ".parse::<NseLevel>().unwrap(), NseLevel::MedioAlto);
        assert_eq!("medio_bajo".parse::<NseLevel>().unwrap(), NseLevel::MedioBajo);
        assert!("Muy alto".parse::<NseLevel>().is_err());
    }

    #[test]
    fn ordering_follows_declaration() {
        assert!(NseLevel::Alto < NseLevel::Bajo);
        assert_eq!(NseLevel::Medio.index(), 2);
    }
}

#[cfg(test)]
mod rng {
    use std::collections::HashSet;

    use crate::{SampleRng, ZoneId};

    #[test]
    fn deterministic_same_seed() {
        let mut a = SampleRng::for_zone(42, ZoneId(3));
        let mut b = SampleRng::for_zone(42, ZoneId(3));
        assert_eq!(a.sample_indices(1000, 20), b.sample_indices(1000, 20));
    }

    #[test]
    fn different_zones_differ() {
        let mut a = SampleRng::for_zone(1, ZoneId(0));
        let mut b = SampleRng::for_zone(1, ZoneId(1));
        assert_ne!(a.sample_indices(10_000, 8), b.sample_indices(10_000, 8));
    }

    #[test]
    fn sampling_is_without_replacement() {
        let mut rng = SampleRng::new(7);
        let items: Vec<u32> = (0..50).collect();
        let drawn = rng.sample_without_replacement(&items, 50);
        let unique: HashSet<_> = drawn.iter().collect();
        assert_eq!(drawn.len(), 50);
        assert_eq!(unique.len(), 50);
    }

    #[test]
    fn amount_is_clamped_to_pool() {
        let mut rng = SampleRng::new(7);
        assert_eq!(rng.sample_indices(3, 10).len(), 3);
        assert!(rng.sample_indices(0, 10).is_empty());
    }
}
