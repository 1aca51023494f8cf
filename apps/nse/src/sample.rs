//! `nse sample`: per-district zone sampling over the city-wide street graph.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use indicatif::{MultiProgress, ProgressBar};

use nse_core::NseLevel;
use nse_output::write_json;
use nse_sampler::{
    BuildOutput, DistrictReport, LogObserver, SamplerConfig, SamplingObserver, ZoneSample,
    build_dataset,
};
use nse_spatial::{GraphCache, GraphProvider, GraphQuery, NetworkType};
use nse_zones::{District, Registry, Zone};

use crate::{GlobalArgs, logging};

#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Points per district, split across its zones
    #[arg(long, default_value_t = 800)]
    pub quota: usize,

    /// Write the sampled points as JSON (label → points)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Logs like [`LogObserver`] and advances a bar per district.
struct Progress {
    bar: ProgressBar,
}

impl SamplingObserver for Progress {
    fn on_zone_sampled(&self, district: &District, zone: &Zone, sample: &ZoneSample) {
        LogObserver.on_zone_sampled(district, zone, sample);
    }

    fn on_district_done(&self, report: &DistrictReport) {
        LogObserver.on_district_done(report);
        self.bar.inc(1);
    }
}

/// Fetch the drive graph for the registry's extent and sample every district.
pub fn build(
    registry: &Registry,
    provider: &dyn GraphProvider,
    config:   &SamplerConfig,
    multi:    &MultiProgress,
) -> Result<BuildOutput> {
    let Some(extent) = registry.extent() else {
        bail!("zone table is empty");
    };
    let cache = GraphCache::new(provider, GraphQuery::BBox(extent));

    let spinner = logging::spinner(multi, "downloading drive network");
    let drive = cache.get(NetworkType::Drive);
    spinner.finish_and_clear();
    let Some(drive) = drive else {
        bail!("drive network for {extent} is unavailable");
    };
    log::info!("drive network: {} nodes", drive.node_count());

    let bar = logging::bar(multi, "districts", registry.district_count() as u64);
    let out = build_dataset(registry, &cache, config, &Progress { bar: bar.clone() });
    bar.finish_and_clear();
    Ok(out)
}

pub fn print_summary(out: &BuildOutput) {
    println!("\n{:<28} {:>7} {:>7} {:>9} {:>6}", "district", "quota", "points", "fallback", "empty");
    for d in &out.districts {
        println!(
            "{:<28} {:>7} {:>7} {:>9} {:>6}",
            d.district,
            d.quota(),
            d.sampled(),
            d.fallbacks(),
            d.empty_zones()
        );
    }
    println!("\n{:<15} {:>7}", "label", "points");
    for level in NseLevel::ALL {
        println!("{:<15} {:>7}", level.label(), out.dataset.count(level));
    }
    println!("{:<15} {:>7}", "total", out.dataset.total());
}

pub fn run(global: &GlobalArgs, args: &SampleArgs, multi: &MultiProgress) -> Result<()> {
    let registry = global.load_registry()?;
    let provider = global.graph_provider()?;
    let config = SamplerConfig { quota_per_district: args.quota, seed: global.seed };

    let out = build(&registry, provider.as_ref(), &config, multi)?;
    print_summary(&out);

    if let Some(path) = &args.output {
        write_json(path, &out.dataset)?;
        log::info!("wrote {}", path.display());
    }
    Ok(())
}
