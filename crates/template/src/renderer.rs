//! The rendering pipeline: fonts, fields, repeaters, photo, serialize.

use crate::fonts::FontBook;
use crate::photo::composite_for_box;
use crate::resolver::{resolve_field, resolve_item_field, resolve_items, FieldValue};
use crate::schema::{TemplateConfig, TextSpec};
use crate::Result;
use indexmap::IndexMap;
use pdf_core::{Color, PdfDocument};
use text_layout::{line_budget, normalize_newlines, wrap_bullets, wrap_paragraphs, BULLET_MARKER};

/// List values without a configured box width wrap against this.
const FALLBACK_WRAP_WIDTH: f64 = 1000.0;

const DEBUG_CROSSHAIR_ARM: f64 = 4.0;
const DEBUG_STROKE: f64 = 0.4;

fn debug_position_color() -> Color {
    Color::rgb(0.2, 0.2, 0.8)
}

fn debug_box_color() -> Color {
    Color::rgb(0.8, 0.2, 0.2)
}

/// Everything a render needs, with all assets already fetched to bytes.
pub struct RenderRequest<'a> {
    pub base_pdf: &'a [u8],
    pub config: &'a TemplateConfig,
    /// The resume record; treated as opaque JSON
    pub resume: &'a serde_json::Value,
    /// Logical font name -> TTF bytes. Insertion order is registration
    /// order; when two names normalize to the same alias, the one inserted
    /// first claims it.
    pub fonts_by_name: &'a IndexMap<String, Vec<u8>>,
    pub photo_bytes: Option<&'a [u8]>,
    /// Draw position crosshairs and bounding boxes for template authoring
    pub debug: bool,
}

/// Render a resume onto the template's base PDF.
///
/// Configuration-resolution problems (missing page, unresolved font, empty
/// value) skip the affected element and are reported at `debug` log level;
/// asset problems (unreadable PDF, font, or photo) fail the whole render.
pub fn render(request: &RenderRequest) -> Result<Vec<u8>> {
    let mut doc = PdfDocument::from_bytes(request.base_pdf)?;

    let mut book = FontBook::new();
    for (name, bytes) in request.fonts_by_name {
        doc.register_font(name, bytes)?;
        book.insert(name);
    }

    let layout = &request.config.layout;

    // Configuring split name parts takes over from the combined field.
    let split_name_configured = layout.fields.contains_key("full_name_first")
        || layout.fields.contains_key("full_name_last");

    for (key, field) in &layout.fields {
        if split_name_configured && key == "full_name" {
            log::debug!("skipping 'full_name': split name fields configured");
            continue;
        }
        if !doc.has_page(field.page) {
            log::debug!("skipping '{key}': page {} not in document", field.page);
            continue;
        }
        if request.debug {
            draw_debug_marks(&mut doc, field.page, field.x, field.y, &field.text)?;
        }
        let value = resolve_field(request.resume, key);
        draw_value(&mut doc, &book, field.page, field.x, field.y, &field.text, &value, key)?;
    }

    for (key, repeater) in &layout.repeaters {
        let Some(items) = resolve_items(request.resume, key) else {
            log::debug!("skipping repeater '{key}': no backing array");
            continue;
        };
        if !doc.has_page(repeater.page) {
            log::debug!("skipping repeater '{key}': page {} not in document", repeater.page);
            continue;
        }
        let count = repeater.item_count(items.len());
        for (index, item) in items.iter().take(count).enumerate() {
            let origin_y = repeater.start.y - index as f64 * repeater.item_gap;
            for (field_key, field) in &repeater.fields {
                let x = repeater.start.x + field.dx;
                let y = origin_y + field.dy;
                if request.debug {
                    draw_debug_marks(&mut doc, repeater.page, x, y, &field.text)?;
                }
                let value = resolve_item_field(item, field_key);
                draw_value(&mut doc, &book, repeater.page, x, y, &field.text, &value, field_key)?;
            }
        }
    }

    if let Some(photo) = &request.config.photo {
        if photo.enabled {
            if let Some(placement) = &photo.placement {
                if doc.has_page(placement.page) {
                    if let Some(bytes) = request.photo_bytes {
                        let png = composite_for_box(bytes, placement)?;
                        doc.draw_image(
                            &png,
                            placement.page,
                            placement.x,
                            placement.y,
                            placement.w,
                            placement.h,
                        )?;
                    }
                    if request.debug {
                        doc.draw_rect_outline(
                            placement.page,
                            placement.x,
                            placement.y,
                            placement.w,
                            placement.h,
                            debug_box_color(),
                            DEBUG_STROKE,
                        )?;
                    }
                } else {
                    log::debug!("skipping photo: page {} not in document", placement.page);
                }
            }
        }
    }

    Ok(doc.to_bytes()?)
}

/// Draw a resolved value at a baseline position, skipping silently when
/// there is nothing to draw or the font cannot be resolved.
#[allow(clippy::too_many_arguments)]
fn draw_value(
    doc: &mut PdfDocument,
    book: &FontBook,
    page: usize,
    x: f64,
    y: f64,
    spec: &TextSpec,
    value: &FieldValue,
    key: &str,
) -> Result<()> {
    if value.is_empty() {
        log::debug!("skipping '{key}': no value");
        return Ok(());
    }
    let Some(font_name) = book.resolve(&spec.font) else {
        log::debug!("skipping '{key}': font '{}' not embedded", spec.font);
        return Ok(());
    };
    let font_name = font_name.to_string();
    let color = Color::from_hex(spec.color.as_deref().unwrap_or("#000000"));
    let line_height = spec.effective_line_height();

    let lines = {
        let measure = |text: &str| doc.text_width(&font_name, text, spec.size).unwrap_or(0.0);
        plan_value(value, spec, &measure)
    };
    for (i, line) in lines.iter().enumerate() {
        // blank lines still occupy a slot
        if line.is_empty() {
            continue;
        }
        doc.draw_text(
            line,
            page,
            x,
            y - i as f64 * line_height,
            &font_name,
            spec.size,
            color,
        )?;
    }
    Ok(())
}

/// Decide which text lines a value produces under a spec's box constraints.
///
/// Wrapping and truncation only engage for a full box (both `w` and `h`).
/// A scalar without one deliberately keeps its explicit newlines as line
/// breaks and never wraps or truncates, so a multi-line value renders the
/// same whether or not the template bothered to size the field.
fn plan_value<F: Fn(&str) -> f32>(value: &FieldValue, spec: &TextSpec, measure: &F) -> Vec<String> {
    match value {
        FieldValue::Empty => Vec::new(),
        FieldValue::List(items) => {
            let wrap_width = spec.w.unwrap_or(FALLBACK_WRAP_WIDTH) as f32;
            let lines = wrap_bullets(items, wrap_width, measure(BULLET_MARKER), measure);
            cap_lines(lines, spec)
        }
        FieldValue::Scalar(text) => match (spec.w, spec.h) {
            (Some(w), Some(_)) => cap_lines(wrap_paragraphs(text, w as f32, measure), spec),
            // no box: explicit newlines split, nothing wraps or truncates
            _ => normalize_newlines(text)
                .split('\n')
                .map(str::to_string)
                .collect(),
        },
    }
}

fn cap_lines(mut lines: Vec<String>, spec: &TextSpec) -> Vec<String> {
    if let Some(h) = spec.h {
        lines.truncate(line_budget(h as f32, spec.effective_line_height() as f32));
    }
    lines
}

/// Position crosshair, plus the bounding box when the spec has one. The box
/// hangs below the baseline origin.
fn draw_debug_marks(
    doc: &mut PdfDocument,
    page: usize,
    x: f64,
    y: f64,
    spec: &TextSpec,
) -> Result<()> {
    let color = debug_position_color();
    doc.draw_line(
        page,
        x - DEBUG_CROSSHAIR_ARM,
        y,
        x + DEBUG_CROSSHAIR_ARM,
        y,
        color,
        DEBUG_STROKE,
    )?;
    doc.draw_line(
        page,
        x,
        y - DEBUG_CROSSHAIR_ARM,
        x,
        y + DEBUG_CROSSHAIR_ARM,
        color,
        DEBUG_STROKE,
    )?;
    if let (Some(w), Some(h)) = (spec.w, spec.h) {
        doc.draw_rect_outline(page, x, y - h, w, h, debug_box_color(), DEBUG_STROKE)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn spec(w: Option<f64>, h: Option<f64>, line_height: Option<f64>) -> TextSpec {
        TextSpec {
            font: "Body".to_string(),
            size: 10.0,
            color: None,
            w,
            h,
            line_height,
        }
    }

    // 10pt per character
    fn measure(text: &str) -> f32 {
        text.chars().count() as f32 * 10.0
    }

    #[test]
    fn scalar_without_box_splits_only_on_newlines() {
        let value = FieldValue::Scalar("a very long line that would wrap\nsecond".into());
        let lines = plan_value(&value, &spec(None, None, None), &measure);
        assert_eq!(
            lines,
            vec!["a very long line that would wrap", "second"]
        );
    }

    #[test]
    fn scalar_with_box_wraps_and_truncates() {
        let value = FieldValue::Scalar("one two three four five six".into());
        // 10 chars per line; line height 12 -> floor(30/12) = 2 lines
        let lines = plan_value(&value, &spec(Some(100.0), Some(30.0), None), &measure);
        assert_eq!(lines, vec!["one two", "three four"]);
    }

    #[test]
    fn scalar_with_width_only_does_not_wrap() {
        let value = FieldValue::Scalar("one two three four".into());
        let lines = plan_value(&value, &spec(Some(50.0), None, None), &measure);
        assert_eq!(lines, vec!["one two three four"]);
    }

    #[test]
    fn explicit_line_height_changes_the_budget() {
        let value = FieldValue::Scalar("one two three four five six".into());
        // line height 10 -> floor(30/10) = 3 lines
        let lines = plan_value(&value, &spec(Some(100.0), Some(30.0), Some(10.0)), &measure);
        assert_eq!(lines, vec!["one two", "three four", "five six"]);
    }

    #[test]
    fn list_without_width_uses_fallback() {
        let long = "word ".repeat(30).trim().to_string();
        let value = FieldValue::List(vec![long]);
        // 1000pt / 10pt-per-char fits 100 chars after the marker
        let lines = plan_value(&value, &spec(None, None, None), &measure);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("- "));
        assert!(lines[1].starts_with("  "));
    }

    #[test]
    fn list_truncates_against_height() {
        let value = FieldValue::List(vec![
            "alpha".into(),
            "beta".into(),
            "gamma".into(),
            "delta".into(),
        ]);
        // line height 12 -> floor(25/12) = 2 lines
        let lines = plan_value(&value, &spec(Some(200.0), Some(25.0), None), &measure);
        assert_eq!(lines, vec!["- alpha", "- beta"]);
    }

    #[test]
    fn empty_value_plans_nothing() {
        assert!(plan_value(&FieldValue::Empty, &spec(None, None, None), &measure).is_empty());
    }
}
