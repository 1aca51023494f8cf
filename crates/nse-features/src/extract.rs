//! Batched extraction and the `X_features.npy` / `y_labels.csv` outputs.

use std::path::Path;
use std::time::{Duration, Instant};

use nse_output::{LabelRow, Matrix, write_labels, write_npy};

use crate::preprocess::load_tensor;
use crate::scan::{CategoryCount, LabelledImage, scan_categories};
use crate::{Batch, EmbeddingModel, FeatureError, FeatureResult};

pub const FEATURES_FILE: &str = "X_features.npy";
pub const LABELS_FILE: &str = "y_labels.csv";

#[derive(Clone, Debug)]
pub struct ExtractConfig {
    pub batch_size: usize,
    /// Target length of the shorter side before cropping.
    pub resize:     u32,
    pub crop:       u32,
    pub mean:       [f32; 3],
    pub std:        [f32; 3],
    pub dim:        usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            batch_size: 16,
            resize:     256,
            crop:       224,
            mean:       [0.485, 0.456, 0.406],
            std:        [0.229, 0.224, 0.225],
            dim:        768,
        }
    }
}

impl ExtractConfig {
    pub fn tensor_len(&self) -> usize {
        3 * (self.crop as usize) * (self.crop as usize)
    }
}

/// Per-batch progress hook.
pub trait ExtractObserver {
    fn on_batch(&mut self, _done: usize, _total: usize) {}
}

pub struct NoopExtractObserver;

impl ExtractObserver for NoopExtractObserver {}

#[derive(Clone, Debug, Default)]
pub struct ExtractStats {
    pub images:     usize,
    /// Images that could not be read; their rows embed a zero tensor.
    pub failed:     usize,
    pub categories: Vec<CategoryCount>,
    pub elapsed:    Duration,
}

impl ExtractStats {
    pub fn images_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 { self.images as f64 / secs } else { 0.0 }
    }
}

/// Load and preprocess one batch; unreadable images become zero tensors.
/// Returns the batch and the number of failures.
fn prepare_batch(chunk: &[LabelledImage], config: &ExtractConfig) -> (Batch, usize) {
    let load = |img: &LabelledImage| match load_tensor(&img.path, config) {
        Ok(t) => Some(t),
        Err(e) => {
            log::warn!("error in {}: {e}", img.path.display());
            None
        }
    };

    #[cfg(not(feature = "parallel"))]
    let tensors: Vec<Option<Vec<f32>>> = chunk.iter().map(load).collect();

    #[cfg(feature = "parallel")]
    let tensors: Vec<Option<Vec<f32>>> = {
        use rayon::prelude::*;
        chunk.par_iter().map(load).collect()
    };

    let len = config.tensor_len();
    let mut data = Vec::with_capacity(len * chunk.len());
    let mut failed = 0;
    for t in tensors {
        match t {
            Some(t) => data.extend_from_slice(&t),
            None => {
                failed += 1;
                data.resize(data.len() + len, 0.0);
            }
        }
    }
    let batch = Batch { data, len: chunk.len(), channels: 3, side: config.crop as usize };
    (batch, failed)
}

/// Embed every image, in order, into an `images.len() × model.dim()` matrix.
///
/// Model errors abort the run; image errors do not.
pub fn extract_features(
    images:   &[LabelledImage],
    model:    &dyn EmbeddingModel,
    config:   &ExtractConfig,
    observer: &mut dyn ExtractObserver,
) -> FeatureResult<(Matrix, usize)> {
    let dim = model.dim();
    if dim != config.dim {
        return Err(FeatureError::Dimension { expected: config.dim, got: dim });
    }

    let mut data = Vec::with_capacity(images.len() * dim);
    let mut failed = 0;
    for chunk in images.chunks(config.batch_size.max(1)) {
        let (batch, bad) = prepare_batch(chunk, config);
        failed += bad;

        let rows = model.embed(&batch)?;
        if rows.len() != chunk.len() {
            return Err(FeatureError::BatchSize { expected: chunk.len(), got: rows.len() });
        }
        for row in rows {
            if row.len() != dim {
                return Err(FeatureError::Dimension { expected: dim, got: row.len() });
            }
            data.extend_from_slice(&row);
        }
        observer.on_batch(data.len() / dim, images.len());
    }

    Ok((Matrix::new(images.len(), dim, data)?, failed))
}

/// Scan `image_root`, embed everything, and write [`FEATURES_FILE`] and
/// [`LABELS_FILE`] into `out_dir`.
pub fn run_extraction(
    image_root: &Path,
    out_dir:    &Path,
    model:      &dyn EmbeddingModel,
    config:     &ExtractConfig,
    observer:   &mut dyn ExtractObserver,
) -> FeatureResult<ExtractStats> {
    let start = Instant::now();
    let (images, categories) = scan_categories(image_root)?;
    let (matrix, failed) = extract_features(&images, model, config, observer)?;

    std::fs::create_dir_all(out_dir)?;
    write_npy(&out_dir.join(FEATURES_FILE), &matrix)?;
    let rows: Vec<LabelRow> = images
        .iter()
        .map(|img| LabelRow {
            image_path: img.path.to_string_lossy().into_owned(),
            label:      img.label,
            category:   img.category.clone(),
        })
        .collect();
    write_labels(&out_dir.join(LABELS_FILE), &rows)?;

    let stats = ExtractStats { images: images.len(), failed, categories, elapsed: start.elapsed() };
    log::info!(
        "features: ({}, {}) in {:.1}s ({:.1} img/s), {} unreadable",
        matrix.rows(),
        matrix.cols(),
        stats.elapsed.as_secs_f64(),
        stats.images_per_sec(),
        failed
    );
    Ok(stats)
}
