//! Image → normalized `3 × crop × crop` tensor.
//!
//! 1. Resize so the shorter side equals `resize` (bilinear); the longer side
//!    is scaled proportionally and truncated.
//! 2. Center-crop `crop × crop`, offsets rounded half-to-even.
//! 3. Scale to `[0, 1]`, subtract the per-channel mean, divide by the
//!    per-channel std.
//! 4. Lay out channel-major (CHW).

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};

use crate::{ExtractConfig, FeatureResult};

/// Dimensions after the shorter side is scaled to `short`.
pub fn resized_dims(width: u32, height: u32, short: u32) -> (u32, u32) {
    if width <= height {
        let h = (short as u64 * height as u64 / width.max(1) as u64) as u32;
        (short, h)
    } else {
        let w = (short as u64 * width as u64 / height.max(1) as u64) as u32;
        (w, short)
    }
}

/// Top-left corner of a centered `crop × crop` window.
pub fn crop_offset(width: u32, height: u32, crop: u32) -> (u32, u32) {
    let off = |len: u32| ((len.saturating_sub(crop)) as f64 / 2.0).round_ties_even() as u32;
    (off(width), off(height))
}

fn to_chw(rgb: &RgbImage, config: &ExtractConfig) -> Vec<f32> {
    let plane = (rgb.width() * rgb.height()) as usize;
    let mut out = vec![0.0f32; 3 * plane];
    for (i, px) in rgb.pixels().enumerate() {
        for c in 0..3 {
            let v = px.0[c] as f32 / 255.0;
            out[c * plane + i] = (v - config.mean[c]) / config.std[c];
        }
    }
    out
}

pub fn preprocess(img: &DynamicImage, config: &ExtractConfig) -> Vec<f32> {
    let rgb = img.to_rgb8();
    let (w, h) = resized_dims(rgb.width(), rgb.height(), config.resize);
    let resized = imageops::resize(&rgb, w, h, FilterType::Triangle);
    let (x, y) = crop_offset(w, h, config.crop);
    let cropped = imageops::crop_imm(&resized, x, y, config.crop, config.crop).to_image();
    to_chw(&cropped, config)
}

pub fn load_tensor(path: &Path, config: &ExtractConfig) -> FeatureResult<Vec<f32>> {
    let img = image::open(path)?;
    Ok(preprocess(&img, config))
}
