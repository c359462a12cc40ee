//! Diff heatmap artifact rendering.
//!
//! Produces a reviewable overlay per failing surface: unchanged pixels stay
//! transparent, differing pixels are shaded green/yellow/red by intensity.
//! Artifacts only; verdicts never depend on this output.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};

use crate::error::Result;

/// Render a heatmap of the differences between a capture and its baseline
/// and write it as a PNG. A capture whose dimensions differ from the
/// baseline is resampled to the baseline's size first.
pub fn render_heatmap(current: &RgbaImage, baseline: &RgbaImage, output_path: &Path) -> Result<()> {
    let (width, height) = baseline.dimensions();
    let current: Cow<'_, RgbaImage> = if current.dimensions() == (width, height) {
        Cow::Borrowed(current)
    } else {
        Cow::Owned(image::imageops::resize(
            current,
            width,
            height,
            FilterType::Lanczos3,
        ))
    };

    let mut heat = RgbaImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let a = current.get_pixel(x, y);
            let b = baseline.get_pixel(x, y);
            heat.put_pixel(x, y, heat_pixel(a, b));
        }
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    heat.save(output_path)?;
    Ok(())
}

fn heat_pixel(a: &Rgba<u8>, b: &Rgba<u8>) -> Rgba<u8> {
    let diff = (a[0] as i16 - b[0] as i16).abs()
        + (a[1] as i16 - b[1] as i16).abs()
        + (a[2] as i16 - b[2] as i16).abs();
    let intensity = (diff as f32 / 765.0).clamp(0.0, 1.0);
    let alpha = (intensity * 200.0).clamp(0.0, 200.0) as u8;

    if intensity < 0.33 {
        let g = (100.0 + intensity / 0.33 * 100.0).clamp(0.0, 200.0) as u8;
        Rgba([0, g, 0, alpha])
    } else if intensity < 0.66 {
        let r = (150.0 + (intensity - 0.33) / 0.33 * 80.0).clamp(150.0, 230.0) as u8;
        Rgba([r, 180, 0, alpha])
    } else {
        let r = (200.0 + (intensity - 0.66) / 0.34 * 55.0).clamp(200.0, 255.0) as u8;
        Rgba([r, 0, 0, alpha])
    }
}
