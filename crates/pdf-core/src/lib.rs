//! PDF Core - Low-level PDF manipulation
//!
//! This crate provides functionality for:
//! - Opening a base PDF document from bytes
//! - Embedding TrueType fonts (Type0 / CIDFontType2, Identity-H)
//! - Drawing text at baseline positions, measured with the embedded font
//! - Drawing images (JPEG, PNG with alpha) and vector overlays
//! - Serializing the finished document back to bytes
//!
//! All coordinates are native PDF coordinates: origin at the bottom-left of
//! the page, y pointing up, text positioned at its baseline.
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Color, PdfDocument};
//!
//! let mut doc = PdfDocument::from_bytes(&base_pdf)?;
//! doc.register_font("body", &ttf_bytes)?;
//! doc.draw_text("Hello, World!", 1, 100.0, 700.0, "body", 12.0, Color::black())?;
//! let bytes = doc.to_bytes()?;
//! ```

mod document;
mod font;
mod image;
mod text;

pub use document::{Color, PdfDocument};
pub use font::{FontData, FontPdfObjects};
pub use image::ImageXObject;
pub use text::{
    generate_line_operators, generate_rect_operators, generate_text_operators, TextRenderContext,
};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to open PDF: {0}")]
    OpenError(String),

    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Font already exists: {0}")]
    FontAlreadyExists(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("PDF parsing error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;
