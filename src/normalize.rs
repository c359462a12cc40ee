//! Capture normalization.
//!
//! Stabilizes a raw capture before comparison: masks configured dynamic
//! regions (pixels and structural text), zeroes animation and transition
//! durations in the effective style, and flags captures whose stabilization
//! the provider could not attest. Pure: no IO, no store access, idempotent.

use image::{Rgba, RgbaImage};

use crate::capture::Capture;
use crate::config::ScreenshotOptions;
use crate::types::structural::StructuralNode;

/// Neutral fill for masked regions, the skeleton placeholder gray.
pub const MASK_COLOR: Rgba<u8> = Rgba([224, 224, 224, 255]);

/// Placeholder for masked structural text.
pub const MASKED_TEXT: &str = "[masked]";

/// Zero-duration value written over transition and animation durations.
const ZERO_DURATION: &str = "0s";

/// Normalize a capture for comparison. Same input always yields the same
/// output.
pub fn normalize(
    mut capture: Capture,
    hide_selectors: &[String],
    options: &ScreenshotOptions,
) -> Capture {
    let masked_roots: Vec<u32> = capture
        .snapshot
        .nodes
        .iter()
        .filter(|node| hide_selectors.iter().any(|sel| selector_matches(node, sel)))
        .map(|node| node.id)
        .collect();

    for root in &masked_roots {
        if let Some(node) = capture.snapshot.node(*root) {
            if let Some(bb) = node.bounding_box {
                mask_rect(&mut capture.image, bb.x, bb.y, bb.width, bb.height);
            }
        }
        for id in subtree_ids(&capture.snapshot.nodes, *root) {
            if let Some(node) = capture.snapshot.nodes.iter_mut().find(|n| n.id == id) {
                if node.text.is_some() {
                    node.text = Some(MASKED_TEXT.to_string());
                }
            }
        }
    }

    for node in &mut capture.snapshot.nodes {
        if let Some(style) = node.style.as_mut() {
            if style.transition_duration.is_some() {
                style.transition_duration = Some(ZERO_DURATION.to_string());
            }
            if style.animation_duration.is_some() {
                style.animation_duration = Some(ZERO_DURATION.to_string());
            }
        }
    }

    // The provider must have awaited stabilization with animations disabled;
    // otherwise results are annotated low-confidence.
    capture.unstable = !capture.snapshot.stabilized || !options.animations_disabled;

    capture
}

/// Match one simple selector against a node's facts. Supported forms:
/// `#id`, `.class`, `tag`, `[attr]`, `[attr="value"]`.
pub fn selector_matches(node: &StructuralNode, selector: &str) -> bool {
    let selector = selector.trim();
    if let Some(id) = selector.strip_prefix('#') {
        return node.attr("id") == Some(id);
    }
    if let Some(class) = selector.strip_prefix('.') {
        return node.has_class(class);
    }
    if let Some(inner) = selector.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        return match inner.split_once('=') {
            Some((name, value)) => {
                let value = value.trim_matches('"').trim_matches('\'');
                node.attr(name.trim()) == Some(value)
            }
            None => node.attr(inner.trim()).is_some(),
        };
    }
    node.tag.eq_ignore_ascii_case(selector)
}

/// Ids of a node and all its descendants. Bounded by the node count so
/// malformed child links cannot loop.
fn subtree_ids(nodes: &[StructuralNode], root: u32) -> Vec<u32> {
    let mut out = vec![root];
    let mut queue = vec![root];
    while let Some(id) = queue.pop() {
        if out.len() > nodes.len() {
            break;
        }
        if let Some(node) = nodes.iter().find(|n| n.id == id) {
            for child in &node.children {
                if !out.contains(child) {
                    out.push(*child);
                    queue.push(*child);
                }
            }
        }
    }
    out
}

fn mask_rect(image: &mut RgbaImage, x: f32, y: f32, width: f32, height: f32) {
    let (img_w, img_h) = image.dimensions();
    let x0 = x.max(0.0).round() as u32;
    let y0 = y.max(0.0).round() as u32;
    let x1 = ((x + width).max(0.0).round() as u32).min(img_w);
    let y1 = ((y + height).max(0.0).round() as u32).min(img_h);

    for py in y0..y1 {
        for px in x0..x1 {
            image.put_pixel(px, py, MASK_COLOR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{ComponentState, Surface};
    use crate::types::structural::{BoundingBox, StructuralSnapshot, StyleFacts};
    use std::collections::BTreeMap;

    fn node(id: u32, tag: &str) -> StructuralNode {
        StructuralNode {
            id,
            tag: tag.to_string(),
            parent: None,
            children: Vec::new(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            text: None,
            bounding_box: None,
            style: None,
        }
    }

    fn capture_with(nodes: Vec<StructuralNode>, stabilized: bool) -> Capture {
        Capture::new(
            Surface::new("home", "/", "mobile", ComponentState::Default),
            RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])),
            StructuralSnapshot { nodes, stabilized },
        )
    }

    #[test]
    fn selector_forms_match_node_facts() {
        let mut n = node(1, "div");
        n.classes.push("dynamic-content".to_string());
        n.attributes
            .insert("id".to_string(), "clock".to_string());
        n.attributes
            .insert("data-testid".to_string(), "timestamp".to_string());

        assert!(selector_matches(&n, "div"));
        assert!(selector_matches(&n, "DIV"));
        assert!(selector_matches(&n, ".dynamic-content"));
        assert!(selector_matches(&n, "#clock"));
        assert!(selector_matches(&n, "[data-testid=\"timestamp\"]"));
        assert!(selector_matches(&n, "[data-testid]"));
        assert!(!selector_matches(&n, "span"));
        assert!(!selector_matches(&n, ".other"));
        assert!(!selector_matches(&n, "[data-testid=\"random-content\"]"));
    }

    #[test]
    fn masks_pixels_and_subtree_text() {
        let mut parent = node(0, "div");
        parent.classes.push("dynamic-content".to_string());
        parent.children.push(1);
        parent.text = Some("10:32:05".to_string());
        parent.bounding_box = Some(BoundingBox {
            x: 2.0,
            y: 2.0,
            width: 4.0,
            height: 4.0,
        });
        let mut child = node(1, "span");
        child.parent = Some(0);
        child.text = Some("AM".to_string());

        let capture = capture_with(vec![parent, child], true);
        let normalized = normalize(
            capture,
            &[".dynamic-content".to_string()],
            &ScreenshotOptions::default(),
        );

        assert_eq!(*normalized.image.get_pixel(3, 3), MASK_COLOR);
        assert_eq!(*normalized.image.get_pixel(5, 5), MASK_COLOR);
        // Outside the masked box the capture is untouched.
        assert_eq!(*normalized.image.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(normalized.snapshot.nodes[0].text.as_deref(), Some(MASKED_TEXT));
        assert_eq!(normalized.snapshot.nodes[1].text.as_deref(), Some(MASKED_TEXT));
    }

    #[test]
    fn normalization_is_idempotent() {
        let mut n = node(0, "div");
        n.classes.push("dynamic-content".to_string());
        n.text = Some("changing".to_string());
        n.bounding_box = Some(BoundingBox {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        });

        let selectors = vec![".dynamic-content".to_string()];
        let options = ScreenshotOptions::default();
        let once = normalize(capture_with(vec![n], true), &selectors, &options);
        let twice = normalize(once.clone(), &selectors, &options);

        assert_eq!(once.image.as_raw(), twice.image.as_raw());
        assert_eq!(once.snapshot.nodes[0].text, twice.snapshot.nodes[0].text);
        assert_eq!(once.unstable, twice.unstable);
    }

    #[test]
    fn zeroes_transition_and_animation_durations() {
        let mut n = node(0, "div");
        n.style = Some(StyleFacts {
            transition_duration: Some("0.3s".to_string()),
            animation_duration: Some("2s".to_string()),
            ..StyleFacts::default()
        });

        let normalized = normalize(capture_with(vec![n], true), &[], &ScreenshotOptions::default());

        let style = normalized.snapshot.nodes[0].style.as_ref().unwrap();
        assert_eq!(style.transition_duration.as_deref(), Some("0s"));
        assert_eq!(style.animation_duration.as_deref(), Some("0s"));
    }

    #[test]
    fn flags_unstable_when_stabilization_not_attested() {
        let unattested = normalize(
            capture_with(vec![node(0, "body")], false),
            &[],
            &ScreenshotOptions::default(),
        );
        assert!(unattested.unstable);

        let attested = normalize(
            capture_with(vec![node(0, "body")], true),
            &[],
            &ScreenshotOptions::default(),
        );
        assert!(!attested.unstable);

        let animations_on = normalize(
            capture_with(vec![node(0, "body")], true),
            &[],
            &ScreenshotOptions {
                animations_disabled: false,
                ..ScreenshotOptions::default()
            },
        );
        assert!(animations_on.unstable);
    }

    #[test]
    fn mask_clamps_boxes_outside_the_image() {
        let mut n = node(0, "div");
        n.classes.push("dynamic-content".to_string());
        n.bounding_box = Some(BoundingBox {
            x: -5.0,
            y: 8.0,
            width: 100.0,
            height: 100.0,
        });

        let normalized = normalize(
            capture_with(vec![n], true),
            &[".dynamic-content".to_string()],
            &ScreenshotOptions::default(),
        );

        assert_eq!(*normalized.image.get_pixel(0, 9), MASK_COLOR);
        assert_eq!(*normalized.image.get_pixel(9, 9), MASK_COLOR);
        assert_eq!(*normalized.image.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    }
}
