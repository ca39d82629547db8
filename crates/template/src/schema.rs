//! Serde model of the template configuration.
//!
//! `fields` and `repeaters` are `IndexMap`s: rendering walks them in
//! configuration order, which keeps output deterministic for a given config.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root template configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<Assets>,
    /// Logical font name -> stored TTF asset
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fonts: IndexMap<String, AssetRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<PhotoConfig>,
    #[serde(default)]
    pub layout: Layout,
}

/// Stored assets backing the template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Assets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_pdf: Option<AssetRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<AssetRef>,
}

/// Pointer to a stored binary asset. Fetching is the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRef {
    pub storage_bucket: String,
    pub storage_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotoConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, rename = "box", skip_serializing_if = "Option::is_none")]
    pub placement: Option<PhotoBox>,
    /// Resume data key the photo comes from (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoBox {
    #[serde(default = "default_page")]
    pub page: usize,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    #[serde(default)]
    pub shape: PhotoShape,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoShape {
    #[default]
    Square,
    Circle,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub page: PageSettings,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, FieldSpec>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub repeaters: IndexMap<String, RepeaterSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSettings {
    pub unit: String,
}

impl Default for PageSettings {
    fn default() -> Self {
        PageSettings {
            unit: "pt".to_string(),
        }
    }
}

/// Text styling and optional bounding box, shared by fields and repeater
/// fields. `w`/`h` bound wrapping and truncation; without them text draws
/// as a single unwrapped line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSpec {
    pub font: String,
    pub size: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    #[serde(default, rename = "lineHeight", skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
}

impl TextSpec {
    /// Configured line height, or `round(size * 1.2)`.
    pub fn effective_line_height(&self) -> f64 {
        self.line_height
            .unwrap_or_else(|| text_layout::default_line_height(self.size) as f64)
    }
}

/// An absolutely positioned field: `(x, y)` is the first-line baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(default = "default_page")]
    pub page: usize,
    pub x: f64,
    pub y: f64,
    #[serde(flatten)]
    pub text: TextSpec,
}

/// A vertically repeating block for a list-valued resume section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepeaterSpec {
    #[serde(default = "default_page")]
    pub page: usize,
    pub start: Point,
    #[serde(rename = "itemGap")]
    pub item_gap: f64,
    #[serde(default, rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, RepeaterFieldSpec>,
}

impl RepeaterSpec {
    /// How many items to draw: `min(maxItems, available)`, with a missing
    /// or zero `maxItems` meaning "all of them".
    pub fn item_count(&self, available: usize) -> usize {
        match self.max_items {
            Some(max) if max > 0 => max.min(available),
            _ => available,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A field inside a repeater, positioned relative to the item origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepeaterFieldSpec {
    #[serde(default)]
    pub dx: f64,
    #[serde(default)]
    pub dy: f64,
    #[serde(flatten)]
    pub text: TextSpec,
}

fn default_page() -> usize {
    1
}
