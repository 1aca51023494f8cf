//! `nse extract`: embed the labelled image tree.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{MultiProgress, ProgressBar};

use nse_features::{
    ExtractConfig, ExtractObserver, FEATURES_FILE, LABELS_FILE, RemoteModel, run_extraction,
};

use crate::logging;

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Root folder with one sub-folder per category
    #[arg(long, default_value = "images")]
    images: PathBuf,

    /// Where X_features.npy and y_labels.csv are written
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Inference endpoint accepting batches of normalized 3×224×224 tensors
    #[arg(long, default_value = "http://127.0.0.1:8000/embed")]
    model_url: String,

    #[arg(long, default_value_t = 16)]
    batch_size: usize,

    /// Embedding length returned by the model
    #[arg(long, default_value_t = 768)]
    dim: usize,

    /// Per-batch request timeout, seconds
    #[arg(long, default_value_t = 120)]
    timeout: u64,
}

struct Progress {
    bar: ProgressBar,
}

impl ExtractObserver for Progress {
    fn on_batch(&mut self, done: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(done as u64);
    }
}

pub fn run(args: &ExtractArgs, multi: &MultiProgress) -> Result<()> {
    let config = ExtractConfig { batch_size: args.batch_size, dim: args.dim, ..ExtractConfig::default() };
    let model = RemoteModel::new(&args.model_url, args.dim, Duration::from_secs(args.timeout))?;

    let mut progress = Progress { bar: logging::bar(multi, "extracting features", 0) };
    let stats = run_extraction(&args.images, &args.out_dir, &model, &config, &mut progress)
        .with_context(|| format!("extracting features from {}", args.images.display()))?;
    progress.bar.finish_and_clear();

    println!("\n{:<15} {:>7}", "category", "images");
    for (label, c) in stats.categories.iter().enumerate() {
        println!("{label}: {:<12} {:>7}", c.category, c.images);
    }
    println!("\nfeatures: {} ({} x {})", args.out_dir.join(FEATURES_FILE).display(), stats.images, config.dim);
    println!("labels:   {} ({} rows)", args.out_dir.join(LABELS_FILE).display(), stats.images);
    println!(
        "{} unreadable images, {:.1}s ({:.1} img/s)",
        stats.failed,
        stats.elapsed.as_secs_f64(),
        stats.images_per_sec()
    );
    Ok(())
}
