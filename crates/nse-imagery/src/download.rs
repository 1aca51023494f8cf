//! Labelled image download.
//!
//! # Layout on disk
//!
//! ```text
//! <output_dir>/
//!   Alto/          Alto_0000_20250101_120000_000001.jpg ...
//!   Medio alto/
//!   Medio/
//!   Medio bajo/
//!   Bajo/
//!   metadata.json
//! ```
//!
//! # Concurrency
//!
//! One unit of work per NSE level (Lima) or per `(city, level)` group
//! (provinces), fanned out on Rayon with the `parallel` feature.  Units
//! share nothing but a [`Mutex`]-guarded accumulator of counters and image
//! records.  A failed availability check, download or write is counted as
//! skipped and never retried.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use chrono::Local;

use nse_core::{GeoPoint, NseLevel, SampleRng};
use nse_output::{ImageRecord, write_metadata};
use nse_sampler::{Dataset, SampledPoint, Target, group_targets, sample_target};
use nse_spatial::GraphProvider;

use crate::{ImageryProvider, ImageryResult};

/// Name of the listing written next to the label folders.
pub const METADATA_FILE: &str = "metadata.json";

#[derive(Clone, Debug)]
pub struct DownloadConfig {
    pub output_dir:       PathBuf,
    /// Billing estimate per downloaded image, USD.
    pub cost_per_image:   f64,
    /// Images wanted per province target; also the number of points drawn.
    pub per_target:       usize,
    pub seed:             u64,
    /// Pause after every request pair, to stay well under quota limits.
    pub request_interval: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir:       PathBuf::from("images"),
            cost_per_image:   0.007,
            per_target:       nse_sampler::DEFAULT_POINTS_PER_TARGET,
            seed:             42,
            request_interval: Duration::ZERO,
        }
    }
}

// ── Stats ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelStats {
    pub attempted:  usize,
    pub downloaded: usize,
    pub skipped:    usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DownloadStats {
    per_level: [LevelStats; NseLevel::COUNT],
}

impl DownloadStats {
    pub fn level(&self, level: NseLevel) -> LevelStats {
        self.per_level[level.index()]
    }

    pub fn downloaded(&self) -> usize {
        self.per_level.iter().map(|s| s.downloaded).sum()
    }

    pub fn skipped(&self) -> usize {
        self.per_level.iter().map(|s| s.skipped).sum()
    }

    pub fn attempted(&self) -> usize {
        self.per_level.iter().map(|s| s.attempted).sum()
    }

    pub fn estimated_cost(&self, cost_per_image: f64) -> f64 {
        self.downloaded() as f64 * cost_per_image
    }

    fn record(&mut self, level: NseLevel, ok: bool) {
        let s = &mut self.per_level[level.index()];
        s.attempted += 1;
        if ok {
            s.downloaded += 1;
        } else {
            s.skipped += 1;
        }
    }

    fn skip_many(&mut self, level: NseLevel, n: usize) {
        self.per_level[level.index()].skipped += n;
    }
}

/// Result of a download run.  `records` is sorted by filename.
#[derive(Debug, Default)]
pub struct DownloadOutcome {
    pub stats:   DownloadStats,
    pub records: Vec<ImageRecord>,
}

/// Per-image progress hook, called from worker threads.
pub trait DownloadObserver: Sync {
    fn on_attempt(&self, _level: NseLevel, _downloaded: bool) {}
}

pub struct NoopDownloadObserver;

impl DownloadObserver for NoopDownloadObserver {}

// ── Shared accumulator ────────────────────────────────────────────────────────

#[derive(Default)]
struct Accumulator {
    stats:   DownloadStats,
    records: Vec<ImageRecord>,
}

struct Shared<'a> {
    acc:      Mutex<Accumulator>,
    observer: &'a dyn DownloadObserver,
}

impl Shared<'_> {
    fn attempt(&self, level: NseLevel, record: Option<ImageRecord>) {
        self.observer.on_attempt(level, record.is_some());
        let mut acc = self.acc.lock().unwrap_or_else(|e| e.into_inner());
        acc.stats.record(level, record.is_some());
        acc.records.extend(record);
    }

    fn skip_many(&self, level: NseLevel, n: usize) {
        let mut acc = self.acc.lock().unwrap_or_else(|e| e.into_inner());
        acc.stats.skip_many(level, n);
    }

    fn finish(self) -> DownloadOutcome {
        let acc = self.acc.into_inner().unwrap_or_else(|e| e.into_inner());
        let mut records = acc.records;
        records.sort_by(|a, b| a.filename.cmp(&b.filename));
        DownloadOutcome { stats: acc.stats, records }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Microsecond local timestamp used in filenames.
pub fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S_%6f").to_string()
}

/// Create `<output_dir>/<label>` for every level.
pub fn create_label_dirs(output_dir: &Path) -> ImageryResult<()> {
    for level in NseLevel::ALL {
        std::fs::create_dir_all(output_dir.join(level.label()))?;
    }
    Ok(())
}

/// Check availability, download, and write one image.  `None` on any
/// failure, which is logged.
fn fetch_to(
    imagery: &dyn ImageryProvider,
    at:      GeoPoint,
    path:    &Path,
    pause:   Duration,
) -> Option<()> {
    let result = match imagery.has_imagery(at) {
        Ok(true) => imagery
            .fetch_image(at)
            .and_then(|bytes| std::fs::write(path, bytes).map_err(Into::into))
            .map(Some),
        Ok(false) => Ok(None),
        Err(e) => Err(e),
    };
    if !pause.is_zero() {
        std::thread::sleep(pause);
    }
    match result {
        Ok(Some(())) => Some(()),
        Ok(None) => {
            log::debug!("no imagery at {at}");
            None
        }
        Err(e) => {
            log::warn!("download failed at {at}: {e}");
            None
        }
    }
}

fn relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base).unwrap_or(path).to_string_lossy().into_owned()
}

// ── Lima dataset ──────────────────────────────────────────────────────────────

/// Download one image per sampled point, one worker per NSE level, and
/// write `metadata.json`.
///
/// Filenames are `<label>_<NNNN>_<timestamp>.jpg`, where `NNNN` counts the
/// level's successful downloads from 0.
pub fn download_dataset(
    dataset:  &Dataset,
    imagery:  &dyn ImageryProvider,
    config:   &DownloadConfig,
    observer: &dyn DownloadObserver,
) -> ImageryResult<DownloadOutcome> {
    create_label_dirs(&config.output_dir)?;
    let shared = Shared { acc: Mutex::new(Accumulator::default()), observer };

    let per_level = |level: NseLevel| {
        let points = dataset.points(level);
        log::info!("[{level}] downloading {} points", points.len());
        download_level(level, points, imagery, config, &shared);
    };

    #[cfg(not(feature = "parallel"))]
    NseLevel::ALL.into_iter().for_each(per_level);

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        NseLevel::ALL.into_par_iter().for_each(per_level);
    }

    let outcome = shared.finish();
    write_metadata(&config.output_dir.join(METADATA_FILE), &outcome.records)?;
    Ok(outcome)
}

fn download_level(
    level:   NseLevel,
    points:  &[SampledPoint],
    imagery: &dyn ImageryProvider,
    config:  &DownloadConfig,
    shared:  &Shared<'_>,
) {
    let dir = config.output_dir.join(level.label());
    let mut successes = 0usize;

    for p in points {
        let ts = timestamp();
        let path = dir.join(format!("{}_{successes:04}_{ts}.jpg", level.label()));
        let record = fetch_to(imagery, p.pos(), &path, config.request_interval).map(|()| {
            successes += 1;
            ImageRecord {
                filename:  relative(&path, &config.output_dir),
                label:     level,
                lat:       p.lat,
                lon:       p.lon,
                district:  p.district.clone(),
                city:      None,
                timestamp: ts,
            }
        });
        shared.attempt(level, record);
    }
    log::info!("[{level}] done: {successes} downloaded, {} skipped", points.len() - successes);
}

// ── Province targets ──────────────────────────────────────────────────────────

/// Sample and download every province target, one worker per
/// `(city, level)` group, and write `metadata.json`.
///
/// Each target gets its own drive-graph fetch and draws
/// `config.per_target` points; downloads stop once that many images are
/// saved.  A target whose graph cannot be fetched counts `per_target`
/// skips.  Filenames are `<city>_<label>_<target>_<NN>_<timestamp>.jpg`,
/// `NN` counting from 01.
pub fn download_targets(
    targets:  &[Target],
    graphs:   &dyn GraphProvider,
    imagery:  &dyn ImageryProvider,
    config:   &DownloadConfig,
    observer: &dyn DownloadObserver,
) -> ImageryResult<DownloadOutcome> {
    create_label_dirs(&config.output_dir)?;
    let shared = Shared { acc: Mutex::new(Accumulator::default()), observer };
    let groups = group_targets(targets);

    let per_group = |(key, members): &((&str, NseLevel), Vec<&Target>)| {
        log::info!("[{} - {}] {} targets", key.0, key.1, members.len());
        for t in members {
            // Offset by position in the full list so each target's draw is
            // independent of grouping and thread scheduling.
            let offset = targets.iter().position(|x| std::ptr::eq(x, *t)).unwrap_or(0);
            download_target(t, offset as u64, graphs, imagery, config, &shared);
        }
    };

    #[cfg(not(feature = "parallel"))]
    groups.iter().for_each(per_group);

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        groups.par_iter().for_each(per_group);
    }

    let outcome = shared.finish();
    write_metadata(&config.output_dir.join(METADATA_FILE), &outcome.records)?;
    Ok(outcome)
}

fn download_target(
    target:  &Target,
    offset:  u64,
    graphs:  &dyn GraphProvider,
    imagery: &dyn ImageryProvider,
    config:  &DownloadConfig,
    shared:  &Shared<'_>,
) {
    let wanted = config.per_target;
    let mut rng = SampleRng::for_unit(config.seed, offset);
    let points = match sample_target(graphs, target, wanted, &mut rng) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("{} ({}): no street graph: {e}", target.name, target.city);
            shared.skip_many(target.level, wanted);
            return;
        }
    };

    let dir = config.output_dir.join(target.level.label());
    let mut saved = 0usize;
    for at in points {
        if saved >= wanted {
            break;
        }
        let ts = timestamp();
        let path = dir.join(format!(
            "{}_{}_{}_{:02}_{ts}.jpg",
            target.city,
            target.level.label(),
            target.name,
            saved + 1
        ));
        let record = fetch_to(imagery, at, &path, config.request_interval).map(|()| {
            saved += 1;
            ImageRecord {
                filename:  relative(&path, &config.output_dir),
                label:     target.level,
                lat:       at.lat,
                lon:       at.lon,
                district:  target.name.clone(),
                city:      Some(target.city.clone()),
                timestamp: ts,
            }
        });
        shared.attempt(target.level, record);
    }
    log::info!("{} ({}): {saved}/{wanted} images", target.name, target.city);
}
