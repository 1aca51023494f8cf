//! `nse download` and `nse provinces`: labelled street-level image downloads.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{MultiProgress, ProgressBar};

use nse_core::NseLevel;
use nse_imagery::{
    DownloadConfig, DownloadObserver, DownloadStats, StreetViewClient, StreetViewConfig,
    download_dataset, download_targets,
};
use nse_sampler::{SamplerConfig, load_targets_csv};

use crate::{GlobalArgs, api_key, logging, sample};

/// Settings shared by both download subcommands.
#[derive(Args, Debug)]
pub struct ImageArgs {
    /// Image width and height in pixels
    #[arg(long, default_value_t = 640)]
    size: u32,

    /// Horizontal field of view, degrees
    #[arg(long, default_value_t = 90)]
    fov: u32,

    /// Camera heading, degrees
    #[arg(long, default_value_t = 0)]
    heading: u32,

    /// Camera pitch, degrees
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pitch: i32,

    /// Pause after each point, in milliseconds
    #[arg(long, default_value_t = 0)]
    interval_ms: u64,

    /// Estimated cost per downloaded image, USD
    #[arg(long, default_value_t = 0.007)]
    cost_per_image: f64,
}

impl ImageArgs {
    fn client(&self) -> Result<StreetViewClient> {
        let key = api_key()?;
        let config = StreetViewConfig {
            width: self.size,
            height: self.size,
            fov: self.fov,
            heading: self.heading,
            pitch: self.pitch,
            ..StreetViewConfig::default()
        };
        Ok(StreetViewClient::new(key, config)?)
    }

    fn download_config(&self, output_dir: &Path, seed: u64) -> DownloadConfig {
        DownloadConfig {
            output_dir: output_dir.to_path_buf(),
            cost_per_image: self.cost_per_image,
            seed,
            request_interval: Duration::from_millis(self.interval_ms),
            ..DownloadConfig::default()
        }
    }
}

struct Progress {
    bar: ProgressBar,
}

impl DownloadObserver for Progress {
    fn on_attempt(&self, _level: NseLevel, _downloaded: bool) {
        self.bar.inc(1);
    }
}

fn print_summary(stats: &DownloadStats, config: &DownloadConfig) {
    println!("\n{:<15} {:>10} {:>8} {:>8}", "label", "downloaded", "skipped", "total");
    for level in NseLevel::ALL {
        let s = stats.level(level);
        println!(
            "{:<15} {:>10} {:>8} {:>8}",
            level.label(),
            s.downloaded,
            s.skipped,
            s.downloaded + s.skipped
        );
    }
    println!("{}", "=".repeat(44));
    println!("downloaded:     {}", stats.downloaded());
    println!("skipped:        {}", stats.skipped());
    println!("estimated cost: ${:.2} USD", stats.estimated_cost(config.cost_per_image));
    println!("location:       {}", config.output_dir.display());
}

// ── download ──────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct DownloadArgs {
    #[command(flatten)]
    sample: sample::SampleArgs,

    #[command(flatten)]
    image: ImageArgs,

    /// Dataset root; one folder per label
    #[arg(long, default_value = "images")]
    out_dir: PathBuf,
}

pub fn download(global: &GlobalArgs, args: &DownloadArgs, multi: &MultiProgress) -> Result<()> {
    // Fail on a missing key before any network work.
    let client = args.image.client()?;
    let registry = global.load_registry()?;
    let provider = global.graph_provider()?;

    let sampler = SamplerConfig { quota_per_district: args.sample.quota, seed: global.seed };
    let built = sample::build(&registry, provider.as_ref(), &sampler, multi)?;
    sample::print_summary(&built);
    if let Some(path) = &args.sample.output {
        nse_output::write_json(path, &built.dataset)?;
    }

    let config = args.image.download_config(&args.out_dir, global.seed);
    let bar = logging::bar(multi, "images", built.dataset.total() as u64);
    let outcome = download_dataset(&built.dataset, &client, &config, &Progress { bar: bar.clone() })
        .with_context(|| format!("downloading into {}", args.out_dir.display()))?;
    bar.finish_and_clear();

    print_summary(&outcome.stats, &config);
    Ok(())
}

// ── provinces ─────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct ProvincesArgs {
    /// Targets CSV (city,label,name,place,lat_min,lat_max,lon_min,lon_max)
    #[arg(long, default_value = "data/province_targets.csv")]
    targets: PathBuf,

    /// Images per target
    #[arg(long, default_value_t = nse_sampler::DEFAULT_POINTS_PER_TARGET)]
    per_target: usize,

    #[command(flatten)]
    image: ImageArgs,

    #[arg(long, default_value = "imagenes_provincias")]
    out_dir: PathBuf,
}

pub fn provinces(global: &GlobalArgs, args: &ProvincesArgs, multi: &MultiProgress) -> Result<()> {
    let client = args.image.client()?;
    let targets = load_targets_csv(&args.targets)
        .with_context(|| format!("loading {}", args.targets.display()))?;
    let provider = global.graph_provider()?;
    log::info!("{} targets, {} images each", targets.len(), args.per_target);

    let config = DownloadConfig {
        per_target: args.per_target,
        ..args.image.download_config(&args.out_dir, global.seed)
    };
    let bar = logging::bar(multi, "images", (targets.len() * args.per_target) as u64);
    let outcome = download_targets(
        &targets,
        provider.as_ref(),
        &client,
        &config,
        &Progress { bar: bar.clone() },
    )
    .with_context(|| format!("downloading into {}", args.out_dir.display()))?;
    bar.finish_and_clear();

    print_summary(&outcome.stats, &config);
    Ok(())
}
