//! Declarative resume-template rendering.
//!
//! A template pairs a base PDF with a JSON configuration describing where
//! resume content goes: absolutely positioned fields, repeating blocks for
//! list sections, an optional photo box, and a font map. Rendering overlays
//! a resume record onto the base PDF and returns the finished bytes.
//!
//! Configuration-resolution problems (unknown page, unresolved font, empty
//! value) skip the affected element; asset problems (unreadable PDF, font,
//! or photo bytes) fail the render.

mod fonts;
mod photo;
mod renderer;
mod resolver;
mod schema;

pub use fonts::{normalize_font_key, FontBook};
pub use photo::{composite_for_box, mask_to_circle, reencode_png};
pub use renderer::{render, RenderRequest};
pub use resolver::{resolve_field, resolve_item_field, resolve_items, split_name, FieldValue};
pub use schema::{
    AssetRef, Assets, FieldSpec, Layout, PageSettings, PhotoBox, PhotoConfig, PhotoShape, Point,
    RepeaterFieldSpec, RepeaterSpec, TemplateConfig, TextSpec,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to parse template config: {0}")]
    ParseError(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] pdf_core::PdfError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TemplateError>;

/// Parse a template configuration from JSON.
pub fn parse_config(json: &str) -> Result<TemplateConfig> {
    serde_json::from_str(json).map_err(|e| TemplateError::ParseError(e.to_string()))
}
