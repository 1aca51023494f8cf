//! Unit tests for nse-sampler.  Graphs are built in memory.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use nse_core::{BBox, GeoPoint, NseLevel, SampleRng};
use nse_spatial::{
    GraphCache, GraphProvider, GraphQuery, NetworkType, SpatialError, SpatialResult, StreetGraph,
    StreetGraphBuilder,
};
use nse_zones::{Registry, RegistryBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn bbox(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> BBox {
    BBox::new(lat_min, lat_max, lon_min, lon_max).unwrap()
}

fn graph(points: &[(f64, f64)]) -> StreetGraph {
    let mut b = StreetGraphBuilder::new();
    for &(lat, lon) in points {
        b.add_node(GeoPoint::new(lat, lon));
    }
    b.build()
}

/// `n × n` regular grid of nodes filling `[lo, hi]²`.
fn grid(lo: f64, hi: f64, n: usize) -> Vec<(f64, f64)> {
    let step = (hi - lo) / (n - 1) as f64;
    (0..n)
        .flat_map(|i| (0..n).map(move |j| (lo + i as f64 * step, lo + j as f64 * step)))
        .collect()
}

/// Serves fixed drive/walk point sets and counts fetches per network.
struct FixedProvider {
    drive:       Option<Vec<(f64, f64)>>,
    walk:        Option<Vec<(f64, f64)>>,
    drive_calls: AtomicUsize,
    walk_calls:  AtomicUsize,
}

impl FixedProvider {
    fn new(drive: Option<Vec<(f64, f64)>>, walk: Option<Vec<(f64, f64)>>) -> Self {
        Self { drive, walk, drive_calls: AtomicUsize::new(0), walk_calls: AtomicUsize::new(0) }
    }
}

impl GraphProvider for FixedProvider {
    fn fetch(&self, query: &GraphQuery, network: NetworkType) -> SpatialResult<StreetGraph> {
        let (points, calls) = match network {
            NetworkType::Drive => (&self.drive, &self.drive_calls),
            NetworkType::Walk  => (&self.walk, &self.walk_calls),
        };
        calls.fetch_add(1, Ordering::SeqCst);
        points
            .as_deref()
            .map(graph)
            .ok_or_else(|| SpatialError::NoNodes(query.to_string()))
    }
}

fn region() -> GraphQuery {
    GraphQuery::BBox(bbox(0.0, 10.0, 0.0, 10.0))
}

/// District "X": zone A (0,1,0,1) Alto, zone B (1,2,1,2) Bajo.
fn registry_x() -> Registry {
    let mut b = RegistryBuilder::new();
    b.add_zone("X", bbox(0.0, 1.0, 0.0, 1.0), NseLevel::Alto);
    b.add_zone("X", bbox(1.0, 2.0, 1.0, 2.0), NseLevel::Bajo);
    b.build()
}

// ── Quota allocation ──────────────────────────────────────────────────────────

#[cfg(test)]
mod allocation {
    use crate::allocate_quota;

    #[test]
    fn quota_is_conserved_when_quota_at_least_zones() {
        for zones in 1..=12 {
            for quota in zones..=zones * 10 + 7 {
                let q = allocate_quota(quota, zones);
                assert_eq!(q.len(), zones);
                assert_eq!(q.iter().sum::<usize>(), quota, "Q={quota} Z={zones}");
            }
        }
    }

    #[test]
    fn remainder_goes_to_first_zones() {
        assert_eq!(allocate_quota(800, 7), vec![115, 115, 114, 114, 114, 114, 114]);
    }

    #[test]
    fn every_zone_gets_at_least_one_when_quota_below_zones() {
        for zones in 2..=10 {
            for quota in 0..zones {
                let q = allocate_quota(quota, zones);
                assert!(q.iter().all(|&n| n >= 1));
                let total: usize = q.iter().sum();
                assert!(total >= zones);
                assert!(total > quota);
            }
        }
    }

    #[test]
    fn zero_zones_is_empty() {
        assert!(allocate_quota(10, 0).is_empty());
    }
}

// ── Zone sampler ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod sampler {
    use super::*;
    use crate::sample_zone;

    #[test]
    fn end_to_end_zone_a() {
        let drive = graph(&[(0.2, 0.2), (0.6, 0.6), (0.9, 0.9), (1.5, 1.5)]);
        let mut rng = SampleRng::new(1);
        let s = sample_zone(&bbox(0.0, 1.0, 0.0, 1.0), 3, &drive, || None, &mut rng);

        assert!(!s.used_fallback);
        let got: HashSet<(u64, u64)> =
            s.points.iter().map(|p| (p.lat.to_bits(), p.lon.to_bits())).collect();
        let want: HashSet<(u64, u64)> = [(0.2, 0.2), (0.6, 0.6), (0.9, 0.9)]
            .iter()
            .map(|&(a, b): &(f64, f64)| (a.to_bits(), b.to_bits()))
            .collect();
        assert_eq!(got, want);
    }

    #[test]
    fn no_duplicates_when_pool_is_large_enough() {
        let drive = graph(&grid(0.0, 1.0, 20));
        for seed in 0..20 {
            let mut rng = SampleRng::new(seed);
            let s = sample_zone(&bbox(0.0, 1.0, 0.0, 1.0), 150, &drive, || None, &mut rng);
            assert_eq!(s.points.len(), 150);
            let unique: HashSet<(u64, u64)> =
                s.points.iter().map(|p| (p.lat.to_bits(), p.lon.to_bits())).collect();
            assert_eq!(unique.len(), 150);
        }
    }

    #[test]
    fn quota_larger_than_pool_returns_pool() {
        let drive = graph(&[(0.1, 0.1), (0.2, 0.2)]);
        let mut rng = SampleRng::new(3);
        let s = sample_zone(&bbox(0.0, 1.0, 0.0, 1.0), 10, &drive, || None, &mut rng);
        assert_eq!(s.points.len(), 2);
    }

    #[test]
    fn walk_fallback_when_drive_has_no_nodes() {
        let drive = graph(&[(5.0, 5.0)]);
        let walk = Arc::new(graph(&[(0.1, 0.1), (0.3, 0.3), (0.5, 0.5), (7.0, 7.0)]));
        let mut rng = SampleRng::new(9);

        let s = sample_zone(&bbox(0.0, 1.0, 0.0, 1.0), 2, &drive, || Some(walk.clone()), &mut rng);
        assert!(s.used_fallback);
        assert_eq!(s.points.len(), 2);

        let s = sample_zone(&bbox(0.0, 1.0, 0.0, 1.0), 10, &drive, || Some(walk.clone()), &mut rng);
        assert!(s.used_fallback);
        assert_eq!(s.points.len(), 3);
    }

    #[test]
    fn walk_graph_not_requested_when_drive_suffices() {
        let drive = graph(&[(0.5, 0.5)]);
        let mut rng = SampleRng::new(0);
        let s = sample_zone(
            &bbox(0.0, 1.0, 0.0, 1.0),
            1,
            &drive,
            || panic!("walk graph must not be fetched"),
            &mut rng,
        );
        assert_eq!(s.points, vec![GeoPoint::new(0.5, 0.5)]);
    }

    #[test]
    fn both_graphs_empty_in_zone() {
        let drive = graph(&[(5.0, 5.0)]);
        let walk = Arc::new(graph(&[(6.0, 6.0)]));
        let mut rng = SampleRng::new(0);
        let s = sample_zone(&bbox(0.0, 1.0, 0.0, 1.0), 4, &drive, || Some(walk), &mut rng);
        assert!(s.is_empty());
        assert!(!s.used_fallback);

        let s = sample_zone(&bbox(0.0, 1.0, 0.0, 1.0), 4, &drive, || None, &mut rng);
        assert!(s.is_empty());
    }
}

// ── Dataset ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod dataset {
    use super::*;
    use crate::{Dataset, SampledPoint};

    #[test]
    fn buckets_by_level() {
        let mut d = Dataset::new();
        d.push(SampledPoint::new(GeoPoint::new(0.1, 0.1), "X", NseLevel::Alto));
        d.push(SampledPoint::new(GeoPoint::new(1.5, 1.5), "X", NseLevel::Bajo));
        d.push(SampledPoint::new(GeoPoint::new(0.2, 0.2), "Y", NseLevel::Alto));
        assert_eq!(d.count(NseLevel::Alto), 2);
        assert_eq!(d.count(NseLevel::Medio), 0);
        assert_eq!(d.total(), 3);
        assert_eq!(d.points(NseLevel::Alto)[1].district, "Y");
    }

    #[test]
    fn merge_appends() {
        let mut a = Dataset::new();
        a.push(SampledPoint::new(GeoPoint::new(0.0, 0.0), "A", NseLevel::Medio));
        let mut b = Dataset::new();
        b.push(SampledPoint::new(GeoPoint::new(1.0, 1.0), "B", NseLevel::Medio));
        a.merge(b);
        let names: Vec<_> = a.points(NseLevel::Medio).iter().map(|p| p.district.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn serializes_as_label_map() {
        let mut d = Dataset::new();
        d.push(SampledPoint::new(GeoPoint::new(-12.1, -77.0), "Lince", NseLevel::MedioAlto));
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["Medio alto"][0]["district"], "Lince");
        assert_eq!(v["Medio alto"][0]["lat"], -12.1);
        assert!(v["Medio alto"][0].get("level").is_none());
        assert_eq!(v["Bajo"].as_array().unwrap().len(), 0);
    }
}

// ── Driver ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod driver {
    use super::*;
    use crate::{NoopObserver, SamplerConfig, build_dataset};

    #[test]
    fn end_to_end_dataset() {
        let provider = FixedProvider::new(
            Some(vec![(0.2, 0.2), (0.6, 0.6), (0.9, 0.9), (1.5, 1.5)]),
            None,
        );
        let cache = GraphCache::new(&provider, region());
        let config = SamplerConfig { quota_per_district: 6, seed: 7 };

        let out = build_dataset(&registry_x(), &cache, &config, &NoopObserver);

        // Quota 6 over two zones → 3 each.  Zone A has 3 nodes; zone B has 1.
        assert_eq!(out.dataset.count(NseLevel::Alto), 3);
        assert_eq!(out.dataset.count(NseLevel::Bajo), 1);
        assert_eq!(out.districts.len(), 1);
        assert_eq!(out.districts[0].quota(), 6);
        assert_eq!(out.districts[0].sampled(), 4);
        assert_eq!(out.districts[0].fallbacks(), 0);
        assert!(out.dataset.points(NseLevel::Bajo).iter().all(|p| p.district == "X"));
    }

    #[test]
    fn missing_drive_graph_yields_empty_dataset() {
        let provider = FixedProvider::new(None, Some(vec![(0.5, 0.5)]));
        let cache = GraphCache::new(&provider, region());
        let out = build_dataset(&registry_x(), &cache, &SamplerConfig::default(), &NoopObserver);
        assert!(out.dataset.is_empty());
        assert!(out.districts.is_empty());
        assert_eq!(provider.walk_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn walk_graph_fetched_once_across_districts() {
        // Drive nodes only far away, so every zone falls back.
        let provider = FixedProvider::new(Some(vec![(9.0, 9.0)]), Some(grid(0.0, 4.0, 41)));
        let mut b = RegistryBuilder::new();
        for d in 0..8 {
            let lo = (d % 4) as f64;
            b.add_zone(&format!("D{d}"), bbox(lo, lo + 0.5, lo, lo + 0.5), NseLevel::Medio);
            b.add_zone(&format!("D{d}"), bbox(lo + 0.5, lo + 1.0, lo + 0.5, lo + 1.0), NseLevel::Bajo);
        }
        let registry = b.build();
        let cache = GraphCache::new(&provider, region());
        let config = SamplerConfig { quota_per_district: 10, seed: 1 };

        let out = build_dataset(&registry, &cache, &config, &NoopObserver);

        assert_eq!(provider.drive_calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.walk_calls.load(Ordering::SeqCst), 1);
        assert_eq!(out.dataset.total(), 80);
        assert!(out.districts.iter().all(|r| r.fallbacks() == 2));
    }

    #[test]
    fn failed_walk_fetch_is_not_retried() {
        let provider = FixedProvider::new(Some(vec![(9.0, 9.0)]), None);
        let cache = GraphCache::new(&provider, region());
        let out = build_dataset(&registry_x(), &cache, &SamplerConfig::default(), &NoopObserver);
        assert!(out.dataset.is_empty());
        assert_eq!(out.districts[0].empty_zones(), 2);
        assert_eq!(provider.walk_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn same_seed_same_dataset() {
        let provider = FixedProvider::new(Some(grid(0.0, 2.0, 30)), None);
        let config = SamplerConfig { quota_per_district: 40, seed: 2024 };

        let run = || {
            let cache = GraphCache::new(&provider, region());
            build_dataset(&registry_x(), &cache, &config, &NoopObserver).dataset
        };
        assert_eq!(run(), run());

        let cache = GraphCache::new(&provider, region());
        let other = build_dataset(
            &registry_x(),
            &cache,
            &SamplerConfig { seed: 2025, ..config.clone() },
            &NoopObserver,
        );
        assert_ne!(run(), other.dataset);
    }
}

// ── Targets ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod targets {
    use super::*;
    use crate::{SampleError, group_targets, load_targets_reader, sample_target};

    const CSV: &str = "\
city,label,name,place,lat_min,lat_max,lon_min,lon_max
Arequipa,Alto,Cayma_1,\"Cayma, Arequipa, Peru\",,,,
Trujillo,Alto,El_Golf,,-8.130,-8.115,-79.045,-79.025
Arequipa,Alto,Yanahuara,\"Yanahuara, Arequipa, Peru\",,,,
Arequipa,Bajo,Cerro_Colorado,\"Cerro Colorado, Arequipa, Peru\",,,,
";

    #[test]
    fn loads_place_and_bbox_targets() {
        let targets = load_targets_reader(CSV.as_bytes()).unwrap();
        assert_eq!(targets.len(), 4);
        assert_eq!(targets[0].area, GraphQuery::Place("Cayma, Arequipa, Peru".into()));
        assert!(matches!(targets[1].area, GraphQuery::BBox(_)));
    }

    #[test]
    fn target_without_area_is_rejected() {
        let csv = "city,label,name,place,lat_min,lat_max,lon_min,lon_max\nPiura,Medio,X,,,,,\n";
        assert!(matches!(
            load_targets_reader(csv.as_bytes()),
            Err(SampleError::InvalidTarget { line: 2, .. })
        ));
    }

    #[test]
    fn grouping_keeps_first_appearance_order() {
        let targets = load_targets_reader(CSV.as_bytes()).unwrap();
        let groups = group_targets(&targets);
        let keys: Vec<_> = groups.iter().map(|(k, v)| (k.0, k.1, v.len())).collect();
        assert_eq!(
            keys,
            vec![
                ("Arequipa", NseLevel::Alto, 2),
                ("Trujillo", NseLevel::Alto, 1),
                ("Arequipa", NseLevel::Bajo, 1),
            ]
        );
    }

    #[test]
    fn sample_target_draws_distinct_nodes() {
        let provider = FixedProvider::new(Some(grid(0.0, 1.0, 10)), None);
        let targets = load_targets_reader(CSV.as_bytes()).unwrap();
        let mut rng = SampleRng::new(5);
        let pts = sample_target(&provider, &targets[1], 10, &mut rng).unwrap();
        let unique: HashSet<(u64, u64)> =
            pts.iter().map(|p| (p.lat.to_bits(), p.lon.to_bits())).collect();
        assert_eq!(unique.len(), 10);
    }

    #[test]
    fn sample_target_propagates_provider_failure() {
        let provider = FixedProvider::new(None, None);
        let targets = load_targets_reader(CSV.as_bytes()).unwrap();
        let mut rng = SampleRng::new(5);
        assert!(matches!(
            sample_target(&provider, &targets[0], 10, &mut rng),
            Err(SampleError::Spatial(_))
        ));
    }

    #[test]
    fn bundled_province_targets_load() {
        let targets =
            load_targets_reader(include_str!("../../../data/province_targets.csv").as_bytes())
                .unwrap();
        assert_eq!(targets.len(), 18);
    }
}
