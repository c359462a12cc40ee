//! Clustering of differing pixels into bounding boxes.
//!
//! Raw per-pixel diffs are too noisy to review. The mask is bucketed into
//! fixed-size blocks, adjacent differing blocks are merged with union-find,
//! and each merged group is reported as one bounding box with its differing
//! pixel count.

use crate::types::DiffRegion;

#[derive(Debug, Clone, Copy)]
pub struct RegionClusterOptions {
    /// Edge length of the scan blocks, in pixels.
    pub block_size: u32,
    /// Maximum gap between blocks, in pixels, for them to merge.
    pub max_gap_px: u32,
}

impl Default for RegionClusterOptions {
    fn default() -> Self {
        Self {
            block_size: 16,
            max_gap_px: 8,
        }
    }
}

/// Cluster a row-major boolean diff mask into merged bounding boxes.
///
/// Output order is deterministic: differing-pixel count descending, then
/// top-to-bottom, left-to-right.
pub fn cluster_diff_regions(
    mask: &[bool],
    width: u32,
    height: u32,
    options: &RegionClusterOptions,
) -> Vec<DiffRegion> {
    if width == 0 || height == 0 || mask.len() < (width * height) as usize {
        return Vec::new();
    }

    let blocks = scan_blocks(mask, width, height, options.block_size.max(1));
    if blocks.is_empty() {
        return Vec::new();
    }

    let n = blocks.len();
    let mut parent: Vec<usize> = (0..n).collect();
    let mut rank: Vec<usize> = vec![0; n];

    fn find(parent: &mut [usize], i: usize) -> usize {
        if parent[i] != i {
            parent[i] = find(parent, parent[i]);
        }
        parent[i]
    }

    fn union(parent: &mut [usize], rank: &mut [usize], i: usize, j: usize) {
        let pi = find(parent, i);
        let pj = find(parent, j);
        if pi == pj {
            return;
        }
        if rank[pi] < rank[pj] {
            parent[pi] = pj;
        } else if rank[pi] > rank[pj] {
            parent[pj] = pi;
        } else {
            parent[pj] = pi;
            rank[pi] += 1;
        }
    }

    for i in 0..n {
        for j in (i + 1)..n {
            if blocks_adjacent(&blocks[i], &blocks[j], options.max_gap_px) {
                union(&mut parent, &mut rank, i, j);
            }
        }
    }

    let mut groups: std::collections::HashMap<usize, Vec<usize>> = std::collections::HashMap::new();
    for i in 0..n {
        let root = find(&mut parent, i);
        groups.entry(root).or_default().push(i);
    }

    let mut regions: Vec<DiffRegion> = groups
        .values()
        .map(|indices| {
            let mut min_x = u32::MAX;
            let mut min_y = u32::MAX;
            let mut max_x = 0u32;
            let mut max_y = 0u32;
            let mut diff_pixels = 0u32;

            for &i in indices {
                let b = &blocks[i];
                min_x = min_x.min(b.x);
                min_y = min_y.min(b.y);
                max_x = max_x.max(b.x + b.width);
                max_y = max_y.max(b.y + b.height);
                diff_pixels += b.diff_pixels;
            }

            DiffRegion {
                x: min_x,
                y: min_y,
                width: max_x - min_x,
                height: max_y - min_y,
                diff_pixels,
            }
        })
        .collect();

    regions.sort_by(|a, b| {
        b.diff_pixels
            .cmp(&a.diff_pixels)
            .then_with(|| a.y.cmp(&b.y))
            .then_with(|| a.x.cmp(&b.x))
    });

    regions
}

/// One scan block that contains at least one differing pixel, in device
/// pixels.
#[derive(Debug, Clone, Copy)]
struct Block {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    diff_pixels: u32,
}

fn scan_blocks(mask: &[bool], width: u32, height: u32, block_size: u32) -> Vec<Block> {
    let w = width as usize;
    let h = height as usize;
    let bs = block_size as usize;
    let mut blocks = Vec::new();

    for y in (0..h).step_by(bs) {
        for x in (0..w).step_by(bs) {
            let block_w = bs.min(w - x);
            let block_h = bs.min(h - y);
            let mut count = 0u32;
            for by in 0..block_h {
                let start = (y + by) * w + x;
                for &hit in &mask[start..start + block_w] {
                    if hit {
                        count += 1;
                    }
                }
            }
            if count > 0 {
                blocks.push(Block {
                    x: x as u32,
                    y: y as u32,
                    width: block_w as u32,
                    height: block_h as u32,
                    diff_pixels: count,
                });
            }
        }
    }

    blocks
}

fn blocks_adjacent(a: &Block, b: &Block, gap: u32) -> bool {
    gap_1d(a.x, a.width, b.x, b.width) <= gap as i64
        && gap_1d(a.y, a.height, b.y, b.height) <= gap as i64
}

fn gap_1d(a_start: u32, a_len: u32, b_start: u32, b_len: u32) -> i64 {
    let a_end = (a_start + a_len) as i64;
    let b_end = (b_start + b_len) as i64;
    if a_end < b_start as i64 {
        b_start as i64 - a_end
    } else if b_end < a_start as i64 {
        a_start as i64 - b_end
    } else {
        0
    }
}
