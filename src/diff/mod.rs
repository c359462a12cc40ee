//! Pixel diff engine.
//!
//! Compares a normalized capture against its stored baseline under
//! configurable tolerance. Pure and deterministic: the same pair of images
//! always yields the same ratio bit-for-bit.

pub mod heatmap;
pub mod regions;

pub use heatmap::render_heatmap;
pub use regions::{cluster_diff_regions, RegionClusterOptions};

use image::{Rgba, RgbaImage};
use palette::{convert::FromColorUnclamped, Lab, Srgb};

use crate::capture::Capture;
use crate::config::ScreenshotOptions;
use crate::types::{DiffResult, DiffVerdict};

/// Tolerances for one comparison.
#[derive(Debug, Clone, Copy)]
pub struct DiffOptions {
    /// Maximum fraction of differing pixels for a pass.
    pub max_diff_pixel_ratio: f64,
    /// Per-pixel perceptual distance above which a pixel counts as
    /// different, normalized to [0, 1].
    pub threshold: f64,
    pub regions: RegionClusterOptions,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            max_diff_pixel_ratio: 0.01,
            threshold: 0.2,
            regions: RegionClusterOptions::default(),
        }
    }
}

impl DiffOptions {
    pub fn from_screenshot(options: &ScreenshotOptions) -> Self {
        Self {
            max_diff_pixel_ratio: options.max_diff_pixel_ratio,
            threshold: options.threshold,
            regions: RegionClusterOptions::default(),
        }
    }
}

/// Compare a normalized capture against its baseline image.
///
/// `None` baseline yields the distinct `no-baseline` verdict; a dimension
/// mismatch is an immediate fail with ratio 1.0 and no pixel comparison.
pub fn compare(current: &Capture, baseline: Option<&RgbaImage>, options: &DiffOptions) -> DiffResult {
    let Some(baseline) = baseline else {
        return DiffResult {
            verdict: DiffVerdict::NoBaseline,
            ratio: 0.0,
            max_diff_pixel_ratio: options.max_diff_pixel_ratio,
            regions: Vec::new(),
            dimension_mismatch: false,
            low_confidence: current.unstable,
            diff_image: None,
        };
    };

    if current.image.dimensions() != baseline.dimensions() {
        return DiffResult {
            verdict: DiffVerdict::Fail,
            ratio: 1.0,
            max_diff_pixel_ratio: options.max_diff_pixel_ratio,
            regions: Vec::new(),
            dimension_mismatch: true,
            low_confidence: current.unstable,
            diff_image: None,
        };
    }

    let (width, height) = current.image.dimensions();
    let mut mask = vec![false; (width as usize) * (height as usize)];
    let mut differing = 0u64;

    for (x, y, pixel) in current.image.enumerate_pixels() {
        let base = baseline.get_pixel(x, y);
        if pixel_distance(*pixel, *base) > options.threshold {
            mask[(y as usize) * (width as usize) + (x as usize)] = true;
            differing += 1;
        }
    }

    let total = (width as u64) * (height as u64);
    let ratio = if total == 0 {
        0.0
    } else {
        differing as f64 / total as f64
    };
    let verdict = if ratio <= options.max_diff_pixel_ratio {
        DiffVerdict::Pass
    } else {
        DiffVerdict::Fail
    };
    let regions = if differing > 0 {
        cluster_diff_regions(&mask, width, height, &options.regions)
    } else {
        Vec::new()
    };

    DiffResult {
        verdict,
        ratio,
        max_diff_pixel_ratio: options.max_diff_pixel_ratio,
        regions,
        dimension_mismatch: false,
        low_confidence: current.unstable,
        diff_image: None,
    }
}

/// Perceptual distance between two pixels: CIELAB Euclidean distance
/// normalized by the black-to-white lightness range, clamped to [0, 1].
/// Partial alpha is composited onto white before conversion.
pub fn pixel_distance(a: Rgba<u8>, b: Rgba<u8>) -> f64 {
    let la = to_lab(a);
    let lb = to_lab(b);
    let dl = la.l - lb.l;
    let da = la.a - lb.a;
    let db = la.b - lb.b;
    let distance = ((dl * dl + da * da + db * db) as f64).sqrt() / 100.0;
    distance.clamp(0.0, 1.0)
}

fn to_lab(pixel: Rgba<u8>) -> Lab {
    let alpha = pixel[3] as f32 / 255.0;
    let composite = |c: u8| (c as f32 / 255.0) * alpha + (1.0 - alpha);
    let srgb = Srgb::new(
        composite(pixel[0]),
        composite(pixel[1]),
        composite(pixel[2]),
    );
    Lab::from_color_unclamped(srgb)
}
