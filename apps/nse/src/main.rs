//! `nse`: build a street-image dataset labelled by socioeconomic level.
//!
//! Pipeline:
//!   1. `nse sample`   : draw street-node coordinates per Lima district zone
//!   2. `nse download` : sample, then fetch one street-level image per point
//!   3. `nse provinces`: the same for named targets in other cities
//!   4. `nse extract`  : embed every image into `X_features.npy` + `y_labels.csv`
//!
//! Helpers: `zones`, `classify`, `bbox-check`, `geocode`.
//!
//! Run with:
//!   cargo run -p nse-cli --release -- download --quota 800
//!
//! Download subcommands read `STREET_VIEW_API_KEY` from the environment or a
//! `.env` file.

mod extract;
mod imagery;
mod inspect;
mod logging;
mod sample;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use nse_spatial::{GeocodeConfig, Geocoder, GraphProvider, OverpassConfig, OverpassProvider};
use nse_zones::{Registry, load_registry_csv, load_registry_strict};

const API_KEY_VAR: &str = "STREET_VIEW_API_KEY";

#[derive(Parser, Debug)]
#[command(name = "nse", version, about = "Street-level image dataset labelled by NSE level")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Zone table CSV (district,lat_min,lat_max,lon_min,lon_max,label);
    /// defaults to the bundled Lima table
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    /// Reject the whole zone table if any row is invalid
    #[arg(long, global = true)]
    strict: bool,

    /// Run seed for every random draw
    #[arg(long, global = true, default_value_t = 42)]
    seed: u64,

    /// Worker threads (defaults to one per core)
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Overpass API interpreter URL
    #[arg(long, global = true, default_value = "https://overpass-api.de/api/interpreter")]
    overpass_url: String,

    /// Read street networks from a local OSM PBF extract instead of Overpass
    #[cfg(feature = "osm")]
    #[arg(long, global = true)]
    pbf: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List districts, or one district's zones and label distribution
    Zones(inspect::ZonesArgs),
    /// Classify a coordinate against the zone table
    Classify(inspect::ClassifyArgs),
    /// Report the approximate area of named bounding boxes
    BboxCheck(inspect::BboxCheckArgs),
    /// Geocode places, subdivide their boxes, write bounding_boxes.json
    Geocode(inspect::GeocodeArgs),
    /// Sample street-node coordinates for every district zone
    Sample(sample::SampleArgs),
    /// Sample, then download one street-level image per point
    Download(imagery::DownloadArgs),
    /// Sample and download images for province targets
    Provinces(imagery::ProvincesArgs),
    /// Embed the labelled image tree with a remote model
    Extract(extract::ExtractArgs),
}

fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    let multi = logging::init_logger();
    let cli = Cli::parse();

    if let Some(n) = cli.global.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .context("configuring the thread pool")?;
    }

    match &cli.command {
        Command::Zones(args)     => inspect::zones(&cli.global, args),
        Command::Classify(args)  => inspect::classify(&cli.global, args),
        Command::BboxCheck(args) => inspect::bbox_check(args),
        Command::Geocode(args)   => inspect::geocode(args),
        Command::Sample(args)    => sample::run(&cli.global, args, &multi),
        Command::Download(args)  => imagery::download(&cli.global, args, &multi),
        Command::Provinces(args) => imagery::provinces(&cli.global, args, &multi),
        Command::Extract(args)   => extract::run(args, &multi),
    }
}

// ── Shared setup ──────────────────────────────────────────────────────────────

impl GlobalArgs {
    pub fn load_registry(&self) -> Result<Registry> {
        let registry = match (&self.registry, self.strict) {
            (None, _) => Registry::lima()?,
            (Some(path), true) => load_registry_strict(path)
                .with_context(|| format!("loading {}", path.display()))?,
            (Some(path), false) => {
                let report = load_registry_csv(path)
                    .with_context(|| format!("loading {}", path.display()))?;
                if !report.rejected.is_empty() {
                    log::warn!("{} invalid zones skipped", report.rejected.len());
                }
                report.registry
            }
        };
        log::info!(
            "zone table: {} districts, {} zones",
            registry.district_count(),
            registry.zone_count()
        );
        Ok(registry)
    }

    /// The street-network source, with place lookups through Nominatim.
    pub fn graph_provider(&self) -> Result<Box<dyn GraphProvider>> {
        let geocoder = Arc::new(Geocoder::new(GeocodeConfig::default())?);

        #[cfg(feature = "osm")]
        if let Some(path) = &self.pbf {
            log::info!("street networks from {}", path.display());
            return Ok(Box::new(nse_spatial::osm::PbfProvider::new(path).with_geocoder(geocoder)));
        }

        let config = OverpassConfig { endpoint: self.overpass_url.clone(), ..OverpassConfig::default() };
        Ok(Box::new(OverpassProvider::new(config)?.with_geocoder(geocoder)))
    }
}

/// The imagery API key, from the environment or `.env`.
pub fn api_key() -> Result<String> {
    match std::env::var(API_KEY_VAR) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => bail!("{API_KEY_VAR} is not set; add it to the environment or a .env file"),
    }
}
