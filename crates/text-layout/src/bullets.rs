//! Bullet-list layout: a `- ` marker on the first line of each item and a
//! two-space hanging indent on continuation lines.

use crate::wrap::{normalize_newlines, wrap_line};

/// Marker prefixed to the first line of each bullet.
pub const BULLET_MARKER: &str = "- ";

const CONTINUATION_PAD: &str = "  ";

/// Lay out bullet items into lines.
///
/// Item bodies wrap to `max_width - marker_width` (floored at 0), with
/// embedded newlines treated as spaces. Empty items are dropped.
pub fn wrap_bullets<F: Fn(&str) -> f32>(
    bullets: &[String],
    max_width: f32,
    marker_width: f32,
    measure: &F,
) -> Vec<String> {
    let body_width = (max_width - marker_width).max(0.0);
    let mut lines = Vec::new();
    for bullet in bullets {
        let normalized = normalize_newlines(bullet.trim());
        if normalized.is_empty() {
            continue;
        }
        for (i, line) in wrap_line(&normalized, body_width, measure).into_iter().enumerate() {
            if i == 0 {
                lines.push(format!("{BULLET_MARKER}{line}"));
            } else {
                lines.push(format!("{CONTINUATION_PAD}{line}"));
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn measure(text: &str) -> f32 {
        text.chars().count() as f32 * 10.0
    }

    fn items(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn single_short_bullet() {
        assert_eq!(
            wrap_bullets(&items(&["shipped it"]), 200.0, 20.0, &measure),
            vec!["- shipped it"]
        );
    }

    #[test]
    fn continuation_lines_get_hanging_indent() {
        // marker eats 20pt, leaving 10 chars for the body
        assert_eq!(
            wrap_bullets(&items(&["built the whole thing"]), 120.0, 20.0, &measure),
            vec!["- built the", "  whole", "  thing"]
        );
    }

    #[test]
    fn empty_bullets_are_dropped() {
        assert_eq!(
            wrap_bullets(&items(&["", "  ", "kept"]), 200.0, 20.0, &measure),
            vec!["- kept"]
        );
    }

    #[test]
    fn newlines_inside_a_bullet_act_as_spaces() {
        assert_eq!(
            wrap_bullets(&items(&["one\r\ntwo"]), 200.0, 20.0, &measure),
            vec!["- one two"]
        );
    }

    #[test]
    fn marker_wider_than_box_floors_body_width_at_zero() {
        // every word overflows a zero-width body and gets its own line
        assert_eq!(
            wrap_bullets(&items(&["a b"]), 10.0, 20.0, &measure),
            vec!["- a", "  b"]
        );
    }
}
