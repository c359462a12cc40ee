//! Approved-baseline store.
//!
//! Baselines live in one directory as `<slug>.png` images with `<slug>.json`
//! provenance beside them. Acceptance overwrites; nothing here ever deletes.
//! Orphaned baselines (on disk but absent from the current surface matrix)
//! are reported so a human can retire them.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::capture::Capture;
use crate::error::{AuditError, Result};
use crate::surface::Surface;

/// Provenance recorded when a baseline is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineMetadata {
    pub surface: Surface,
    /// Unix epoch milliseconds at acceptance.
    pub accepted_at_ms: u64,
    /// SHA-256 hex of the structural snapshot at acceptance.
    pub snapshot_hash: String,
    pub width: u32,
    pub height: u32,
}

/// One stored baseline, as listed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineEntry {
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BaselineMetadata>,
}

/// Directory-backed baseline store.
///
/// Within one process, writes to the same surface are serialized by an
/// in-flight reservation set; an overlapping accept fails with
/// [`AuditError::ConcurrentBaselineWrite`] instead of tearing the
/// image/metadata pair.
#[derive(Debug)]
pub struct BaselineStore {
    root: PathBuf,
    in_flight: Mutex<HashSet<String>>,
}

impl BaselineStore {
    /// Opens the store, creating the directory when absent.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            in_flight: Mutex::new(HashSet::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn image_path(&self, surface: &Surface) -> PathBuf {
        self.root.join(format!("{}.png", surface.slug()))
    }

    pub fn metadata_path(&self, surface: &Surface) -> PathBuf {
        self.root.join(format!("{}.json", surface.slug()))
    }

    /// The approved image for a surface, if one has been accepted.
    pub fn lookup(&self, surface: &Surface) -> Result<Option<RgbaImage>> {
        let path = self.image_path(surface);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(image::open(&path)?.to_rgba8()))
    }

    /// Provenance for a surface's baseline, if recorded.
    pub fn metadata(&self, surface: &Surface) -> Result<Option<BaselineMetadata>> {
        let path = self.metadata_path(surface);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Accepts a capture as the new approved baseline for its surface,
    /// overwriting any previous baseline.
    pub fn accept(&self, capture: &Capture) -> Result<BaselineMetadata> {
        let _reservation = self.reserve(&capture.surface)?;

        let (width, height) = capture.image.dimensions();
        capture.image.save(self.image_path(&capture.surface))?;

        let metadata = BaselineMetadata {
            surface: capture.surface.clone(),
            accepted_at_ms: epoch_ms(),
            snapshot_hash: capture.snapshot.content_hash(),
            width,
            height,
        };
        let json = serde_json::to_string_pretty(&metadata)?;
        fs::write(self.metadata_path(&capture.surface), json)?;
        Ok(metadata)
    }

    /// Every stored baseline, sorted by slug. Files whose names are not
    /// surface slugs are not baselines and are ignored; malformed metadata
    /// lists as absent rather than failing the walk.
    pub fn list(&self) -> Result<Vec<BaselineEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.extension().map(|ext| ext == "png").unwrap_or(false) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let Ok(surface) = stem.parse::<Surface>() else {
                continue;
            };
            entries.push(BaselineEntry {
                slug: stem.to_string(),
                metadata: self.metadata(&surface).ok().flatten(),
            });
        }
        entries.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(entries)
    }

    /// Baselines with no counterpart in the given surface matrix.
    pub fn orphans(&self, known: &[Surface]) -> Result<Vec<Surface>> {
        let known: HashSet<Surface> = known.iter().cloned().collect();
        let mut orphans = Vec::new();
        for entry in self.list()? {
            let Ok(surface) = entry.slug.parse::<Surface>() else {
                continue;
            };
            if !known.contains(&surface) {
                orphans.push(surface);
            }
        }
        Ok(orphans)
    }

    fn reserve(&self, surface: &Surface) -> Result<WriteReservation<'_>> {
        let slug = surface.slug();
        let mut slots = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !slots.insert(slug.clone()) {
            return Err(AuditError::ConcurrentBaselineWrite { surface: slug });
        }
        Ok(WriteReservation {
            slots: &self.in_flight,
            slug,
        })
    }
}

/// Releases the per-surface write slot when the accept completes or fails.
struct WriteReservation<'a> {
    slots: &'a Mutex<HashSet<String>>,
    slug: String,
}

impl Drop for WriteReservation<'_> {
    fn drop(&mut self) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.remove(&self.slug);
    }
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
