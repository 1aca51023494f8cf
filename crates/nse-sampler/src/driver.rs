//! The distribution driver: sample every zone of every district into one
//! [`Dataset`].
//!
//! # Per-run flow
//!
//! 1. Obtain the city-wide drive graph from the [`GraphCache`].  Without it
//!    nothing can be sampled: the failure is logged and an empty dataset is
//!    returned.
//! 2. For each district (in parallel with the `parallel` feature), split
//!    the quota with [`allocate_quota`] and sample each zone in declared
//!    order.  The walk graph is requested from the same cache only when a
//!    zone has no drive nodes, so it is fetched at most once per run.
//! 3. Merge per-district results in registry order.
//!
//! Each zone draws from its own [`SampleRng::for_zone`] stream, so the
//! dataset for a given seed and graph is the same whether districts run
//! sequentially or on a thread pool.

use nse_core::{NseLevel, SampleRng, ZoneId};
use nse_spatial::{GraphCache, NetworkType, StreetGraph};
use nse_zones::{District, Registry, Zone};

use crate::{Dataset, SampledPoint, ZoneSample, allocate_quota, sample_zone};

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct SamplerConfig {
    /// Points requested per district, split across its zones.
    pub quota_per_district: usize,
    pub seed:               u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self { quota_per_district: 800, seed: 42 }
    }
}

// ── Reports ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct ZoneReport {
    pub zone:          ZoneId,
    pub level:         NseLevel,
    pub quota:         usize,
    pub sampled:       usize,
    pub used_fallback: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DistrictReport {
    pub district: String,
    pub zones:    Vec<ZoneReport>,
}

impl DistrictReport {
    pub fn sampled(&self) -> usize {
        self.zones.iter().map(|z| z.sampled).sum()
    }

    pub fn quota(&self) -> usize {
        self.zones.iter().map(|z| z.quota).sum()
    }

    pub fn fallbacks(&self) -> usize {
        self.zones.iter().filter(|z| z.used_fallback).count()
    }

    /// Zones that produced no points from either graph.
    pub fn empty_zones(&self) -> usize {
        self.zones.iter().filter(|z| z.sampled == 0).count()
    }
}

/// Output of [`build_dataset`].
#[derive(Debug, Default)]
pub struct BuildOutput {
    pub dataset:   Dataset,
    pub districts: Vec<DistrictReport>,
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Progress callbacks for [`build_dataset`].
///
/// Methods take `&self` and the trait requires `Sync` because districts may
/// be sampled on several threads at once.  All methods default to no-ops.
pub trait SamplingObserver: Sync {
    fn on_district_start(&self, _district: &District) {}

    fn on_zone_sampled(&self, _district: &District, _zone: &Zone, _sample: &ZoneSample) {}

    fn on_district_done(&self, _report: &DistrictReport) {}
}

pub struct NoopObserver;

impl SamplingObserver for NoopObserver {}

/// Streams one log line per district and one per fallback or empty zone.
pub struct LogObserver;

impl SamplingObserver for LogObserver {
    fn on_zone_sampled(&self, district: &District, zone: &Zone, sample: &ZoneSample) {
        if sample.used_fallback {
            log::info!(
                "{} {} ({}): no drive nodes, {} points from walk graph",
                district.name, zone.id, zone.level, sample.points.len()
            );
        } else if sample.is_empty() {
            log::warn!("{} {} ({}): no street nodes in zone", district.name, zone.id, zone.level);
        }
    }

    fn on_district_done(&self, report: &DistrictReport) {
        log::info!(
            "{}: {} points from {} zones ({} fallback, {} empty)",
            report.district,
            report.sampled(),
            report.zones.len(),
            report.fallbacks(),
            report.empty_zones()
        );
    }
}

// ── Driver ────────────────────────────────────────────────────────────────────

/// Sample every district of `registry`.
pub fn build_dataset(
    registry: &Registry,
    cache:    &GraphCache<'_>,
    config:   &SamplerConfig,
    observer: &dyn SamplingObserver,
) -> BuildOutput {
    let Some(drive) = cache.get(NetworkType::Drive) else {
        log::error!("drive graph unavailable for {}; nothing can be sampled", cache.region());
        return BuildOutput::default();
    };

    let per_district = |d: &District| sample_district(d, &drive, cache, config, observer);

    #[cfg(not(feature = "parallel"))]
    let results: Vec<(Dataset, DistrictReport)> =
        registry.districts().iter().map(per_district).collect();

    #[cfg(feature = "parallel")]
    let results: Vec<(Dataset, DistrictReport)> = {
        use rayon::prelude::*;
        registry.districts().par_iter().map(per_district).collect()
    };

    let mut out = BuildOutput::default();
    for (data, report) in results {
        out.dataset.merge(data);
        out.districts.push(report);
    }
    out
}

/// Sample all zones of one district against an already-fetched drive graph.
pub fn sample_district(
    district: &District,
    drive:    &StreetGraph,
    cache:    &GraphCache<'_>,
    config:   &SamplerConfig,
    observer: &dyn SamplingObserver,
) -> (Dataset, DistrictReport) {
    observer.on_district_start(district);

    let quotas = allocate_quota(config.quota_per_district, district.zones.len());
    let mut data = Dataset::new();
    let mut zones = Vec::with_capacity(district.zones.len());

    for (zone, &quota) in district.zones.iter().zip(&quotas) {
        let mut rng = SampleRng::for_zone(config.seed, zone.id);
        let sample = sample_zone(&zone.bbox, quota, drive, || cache.get(NetworkType::Walk), &mut rng);
        observer.on_zone_sampled(district, zone, &sample);

        zones.push(ZoneReport {
            zone:          zone.id,
            level:         zone.level,
            quota,
            sampled:       sample.points.len(),
            used_fallback: sample.used_fallback,
        });
        data.extend(
            sample
                .points
                .into_iter()
                .map(|p| SampledPoint::new(p, &district.name, zone.level)),
        );
    }

    let report = DistrictReport { district: district.name.clone(), zones };
    observer.on_district_done(&report);
    (data, report)
}
