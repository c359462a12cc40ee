//! Capture intake.
//!
//! The engine never drives a browser. Captures arrive through the
//! [`CaptureProvider`] interface; the shipped [`DirectoryProvider`] reads
//! capture pairs an external automation driver wrote to disk.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::{AuditError, Result};
use crate::surface::Surface;
use crate::types::StructuralSnapshot;

/// One point-in-time rendering of a Surface: pixels plus structural facts.
/// Produced fresh on every run; never mutated after normalization.
#[derive(Debug, Clone)]
pub struct Capture {
    pub surface: Surface,
    pub image: RgbaImage,
    pub snapshot: StructuralSnapshot,
    /// Set by the normalizer when stabilization cannot be confirmed.
    /// Comparisons proceed but are annotated low-confidence.
    pub unstable: bool,
}

impl Capture {
    pub fn new(surface: Surface, image: RgbaImage, snapshot: StructuralSnapshot) -> Self {
        Self {
            surface,
            image,
            snapshot,
            unstable: false,
        }
    }
}

/// Source of captures for a run.
///
/// `Ok(None)` means the Surface produced no capture this run (the report
/// skips it); errors are reserved for captures that exist but cannot be
/// read. Implementations are called from parallel audit tasks.
pub trait CaptureProvider: Send + Sync {
    fn fetch(&self, surface: &Surface) -> Result<Option<Capture>>;
}

/// File-backed provider reading `<slug>.png` plus `<slug>.json` pairs from
/// a capture directory.
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn image_path(&self, surface: &Surface) -> PathBuf {
        self.root.join(format!("{}.png", surface.slug()))
    }

    fn snapshot_path(&self, surface: &Surface) -> PathBuf {
        self.root.join(format!("{}.json", surface.slug()))
    }
}

impl CaptureProvider for DirectoryProvider {
    fn fetch(&self, surface: &Surface) -> Result<Option<Capture>> {
        let image_path = self.image_path(surface);
        let snapshot_path = self.snapshot_path(surface);

        match (image_path.exists(), snapshot_path.exists()) {
            (false, false) => return Ok(None),
            (true, false) => {
                return Err(AuditError::capture(format!(
                    "capture {} has an image but no structural snapshot",
                    surface.slug()
                )))
            }
            (false, true) => {
                return Err(AuditError::capture(format!(
                    "capture {} has a structural snapshot but no image",
                    surface.slug()
                )))
            }
            (true, true) => {}
        }

        let image = image::open(&image_path)
            .map_err(|e| {
                AuditError::capture(format!(
                    "unreadable capture image {}: {e}",
                    image_path.display()
                ))
            })?
            .to_rgba8();

        let raw = fs::read_to_string(&snapshot_path)?;
        let snapshot: StructuralSnapshot = serde_json::from_str(&raw).map_err(|e| {
            AuditError::capture(format!(
                "malformed structural snapshot {}: {e}",
                snapshot_path.display()
            ))
        })?;

        Ok(Some(Capture::new(surface.clone(), image, snapshot)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::ComponentState;
    use crate::types::structural::StructuralNode;
    use image::Rgba;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn surface() -> Surface {
        Surface::new("home", "/", "mobile", ComponentState::Default)
    }

    fn snapshot() -> StructuralSnapshot {
        StructuralSnapshot {
            nodes: vec![StructuralNode {
                id: 0,
                tag: "body".to_string(),
                parent: None,
                children: Vec::new(),
                classes: Vec::new(),
                attributes: BTreeMap::new(),
                text: None,
                bounding_box: None,
                style: None,
            }],
            stabilized: true,
        }
    }

    fn write_pair(dir: &Path, slug: &str) {
        let img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]));
        img.save(dir.join(format!("{slug}.png"))).unwrap();
        let json = serde_json::to_string(&snapshot()).unwrap();
        fs::write(dir.join(format!("{slug}.json")), json).unwrap();
    }

    #[test]
    fn fetch_reads_capture_pair() {
        let dir = TempDir::new().unwrap();
        write_pair(dir.path(), "home--mobile");

        let provider = DirectoryProvider::new(dir.path());
        let capture = provider.fetch(&surface()).unwrap().unwrap();

        assert_eq!(capture.image.dimensions(), (4, 4));
        assert_eq!(capture.snapshot.nodes.len(), 1);
        assert!(capture.snapshot.stabilized);
        assert!(!capture.unstable);
    }

    #[test]
    fn fetch_returns_none_when_pair_missing() {
        let dir = TempDir::new().unwrap();
        let provider = DirectoryProvider::new(dir.path());
        assert!(provider.fetch(&surface()).unwrap().is_none());
    }

    #[test]
    fn fetch_rejects_half_pair() {
        let dir = TempDir::new().unwrap();
        let img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]));
        img.save(dir.path().join("home--mobile.png")).unwrap();

        let provider = DirectoryProvider::new(dir.path());
        let err = provider.fetch(&surface()).unwrap_err();
        assert!(err.to_string().contains("no structural snapshot"));
    }

    #[test]
    fn fetch_rejects_malformed_snapshot_json() {
        let dir = TempDir::new().unwrap();
        let img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]));
        img.save(dir.path().join("home--mobile.png")).unwrap();
        fs::write(dir.path().join("home--mobile.json"), "{not json").unwrap();

        let provider = DirectoryProvider::new(dir.path());
        let err = provider.fetch(&surface()).unwrap_err();
        assert!(err.to_string().contains("malformed structural snapshot"));
    }
}
