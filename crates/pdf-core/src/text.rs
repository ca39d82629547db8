//! Content-stream operator generation for text and vector overlays.

use crate::document::Color;

/// Parameters for a single text draw.
#[derive(Debug, Clone)]
pub struct TextRenderContext {
    /// Page resource name of the font (e.g. "F1")
    pub font_resource: String,
    pub font_size: f32,
    pub color: Color,
}

/// Operators for one baseline-positioned run of Identity-H encoded text.
pub fn generate_text_operators(text_hex: &str, x: f64, y: f64, ctx: &TextRenderContext) -> Vec<u8> {
    format!(
        "BT\n{} {} {} rg\n/{} {} Tf\n{} {} Td\n<{}> Tj\nET\n",
        ctx.color.r, ctx.color.g, ctx.color.b, ctx.font_resource, ctx.font_size, x, y, text_hex,
    )
    .into_bytes()
}

/// Operators for a stroked line segment.
pub fn generate_line_operators(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    color: Color,
    thickness: f64,
) -> Vec<u8> {
    format!(
        "q\n{} {} {} RG\n{} w\n{} {} m\n{} {} l\nS\nQ\n",
        color.r, color.g, color.b, thickness, x1, y1, x2, y2,
    )
    .into_bytes()
}

/// Operators for a stroked (not filled) rectangle outline.
pub fn generate_rect_operators(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    color: Color,
    thickness: f64,
) -> Vec<u8> {
    format!(
        "q\n{} {} {} RG\n{} w\n{} {} {} {} re\nS\nQ\n",
        color.r, color.g, color.b, thickness, x, y, width, height,
    )
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn text_operators_wrap_in_bt_et() {
        let ctx = TextRenderContext {
            font_resource: "F1".to_string(),
            font_size: 12.0,
            color: Color::black(),
        };
        let ops = String::from_utf8(generate_text_operators("0041", 50.0, 700.0, &ctx)).unwrap();
        assert!(ops.starts_with("BT\n"));
        assert!(ops.ends_with("ET\n"));
        assert!(ops.contains("/F1 12 Tf"));
        assert!(ops.contains("50 700 Td"));
        assert!(ops.contains("<0041> Tj"));
    }

    #[test]
    fn line_operators_are_state_isolated() {
        let ops = String::from_utf8(generate_line_operators(
            0.0,
            0.0,
            10.0,
            0.0,
            Color::rgb(0.2, 0.2, 0.8),
            0.4,
        ))
        .unwrap();
        assert!(ops.starts_with("q\n"));
        assert!(ops.ends_with("Q\n"));
        assert!(ops.contains("0.2 0.2 0.8 RG"));
        assert!(ops.contains("0.4 w"));
    }

    #[test]
    fn rect_operators_stroke_only() {
        let ops = String::from_utf8(generate_rect_operators(
            10.0,
            20.0,
            100.0,
            50.0,
            Color::rgb(0.8, 0.2, 0.2),
            0.4,
        ))
        .unwrap();
        assert_eq!(
            ops,
            "q\n0.8 0.2 0.2 RG\n0.4 w\n10 20 100 50 re\nS\nQ\n"
        );
    }
}
