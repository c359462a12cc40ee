//! Structural snapshot types for captured surfaces.
//!
//! A capture provider serializes DOM/CSS facts into this shape alongside the
//! screenshot. Only the computed-style properties the audits consume are
//! carried; everything else is the provider's business.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Rectangle bounds for an element, in device pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Computed-style facts for one element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleFacts {
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub background_image: Option<String>,
    pub border_color: Option<String>,
    pub padding: Option<String>,
    pub gap: Option<String>,
    pub transition_duration: Option<String>,
    pub animation_duration: Option<String>,
}

impl StyleFacts {
    /// Properties that can carry color literals, with their CSS names.
    pub fn color_properties(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("color", self.color.as_deref()),
            ("background-color", self.background_color.as_deref()),
            ("background-image", self.background_image.as_deref()),
            ("border-color", self.border_color.as_deref()),
        ]
    }

    /// Properties that carry spacing values, with their CSS names.
    pub fn spacing_properties(&self) -> [(&'static str, Option<&str>); 2] {
        [
            ("padding", self.padding.as_deref()),
            ("gap", self.gap.as_deref()),
        ]
    }
}

/// A single element with its structural facts.
///
/// Attributes use a sorted map so snapshot serialization (and therefore the
/// snapshot hash) is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralNode {
    pub id: u32,
    pub tag: String,
    pub parent: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleFacts>,
}

impl StructuralNode {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// CSS-ish selector describing this node, used in violation evidence.
    pub fn selector(&self) -> String {
        let mut out = self.tag.clone();
        if let Some(id) = self.attr("id") {
            out.push('#');
            out.push_str(id);
        }
        for class in &self.classes {
            out.push('.');
            out.push_str(class);
        }
        out
    }
}

/// Serialized DOM/CSS facts for one capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralSnapshot {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<StructuralNode>,
    /// Provider attestation that animations and transitions had settled when
    /// the screenshot was taken. Absent means "cannot guarantee".
    #[serde(default)]
    pub stabilized: bool,
}

impl StructuralSnapshot {
    pub fn node(&self, id: u32) -> Option<&StructuralNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Walks the parent chain from (excluding) `id` to the root.
    /// Bounded by node count, so a malformed cyclic snapshot cannot loop.
    pub fn ancestors(&self, id: u32) -> Vec<&StructuralNode> {
        let mut out = Vec::new();
        let mut current = self.node(id).and_then(|n| n.parent);
        while let Some(parent_id) = current {
            if out.len() >= self.nodes.len() {
                break;
            }
            match self.node(parent_id) {
                Some(parent) => {
                    out.push(parent);
                    current = parent.parent;
                }
                None => break,
            }
        }
        out
    }

    /// Concatenated text content of `id` and its descendants.
    pub fn subtree_text(&self, id: u32) -> String {
        let mut out = String::new();
        let mut queue = vec![id];
        let mut seen = 0usize;
        while let Some(next) = queue.pop() {
            seen += 1;
            if seen > self.nodes.len() {
                break;
            }
            if let Some(node) = self.node(next) {
                if let Some(text) = &node.text {
                    if !out.is_empty() && !text.is_empty() {
                        out.push(' ');
                    }
                    out.push_str(text);
                }
                queue.extend(node.children.iter().copied());
            }
        }
        out
    }

    /// SHA-256 hex digest of the canonical JSON serialization.
    ///
    /// Node order, field order, and sorted attribute maps make the
    /// serialization deterministic, so the digest is stable across runs.
    pub fn content_hash(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        hex::encode(hasher.finalize())
    }
}
