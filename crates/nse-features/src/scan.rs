//! Category-folder discovery.
//!
//! Every sub-directory of the root is a category; its label is its index in
//! name order.  Only `*.jpg` and `*.png` files directly inside a category
//! folder are picked up.

use std::path::{Path, PathBuf};

use crate::{FeatureError, FeatureResult};

const EXTENSIONS: [&str; 2] = ["jpg", "png"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelledImage {
    pub path:     PathBuf,
    pub label:    usize,
    pub category: String,
}

/// Category name and image count, in label order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub images:   usize,
}

fn sorted_entries(dir: &Path) -> FeatureResult<Vec<PathBuf>> {
    let mut paths = std::fs::read_dir(dir)?
        .map(|e| e.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.sort();
    Ok(paths)
}

fn is_image(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| EXTENSIONS.contains(&e))
}

/// List every image under `root`, grouped by category in label order and
/// sorted by file name within a category.
///
/// # Errors
///
/// [`FeatureError::NoCategories`] when `root` has no sub-directories.
pub fn scan_categories(root: &Path) -> FeatureResult<(Vec<LabelledImage>, Vec<CategoryCount>)> {
    let folders: Vec<PathBuf> = sorted_entries(root)?.into_iter().filter(|p| p.is_dir()).collect();
    if folders.is_empty() {
        return Err(FeatureError::NoCategories(root.to_path_buf()));
    }

    let mut images = Vec::new();
    let mut counts = Vec::with_capacity(folders.len());
    for (label, folder) in folders.iter().enumerate() {
        let category = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let before = images.len();
        images.extend(sorted_entries(folder)?.into_iter().filter(|p| is_image(p)).map(|path| {
            LabelledImage { path, label, category: category.clone() }
        }));
        let found = images.len() - before;
        log::info!("{label}: {category} - {found} images");
        counts.push(CategoryCount { category, images: found });
    }
    log::info!("{} images in {} categories", images.len(), counts.len());
    Ok((images, counts))
}
