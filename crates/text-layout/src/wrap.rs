//! Greedy word wrapping against a caller-supplied width measure.

/// Collapse `\r\n` and bare `\r` to `\n`.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Greedily wrap a single paragraph (no newlines) to `max_width`.
///
/// Words are whitespace-separated and never broken: a word wider than
/// `max_width` gets a line of its own and overflows.
pub fn wrap_line<F: Fn(&str) -> f32>(text: &str, max_width: f32, measure: &F) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if measure(&candidate) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        current = word.to_string();
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrap multi-paragraph text: normalize newlines, wrap each paragraph
/// independently, keep blank paragraphs as empty lines (vertical gaps).
pub fn wrap_paragraphs<F: Fn(&str) -> f32>(
    text: &str,
    max_width: f32,
    measure: &F,
) -> Vec<String> {
    let normalized = normalize_newlines(text);
    let mut lines = Vec::new();
    for paragraph in normalized.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        lines.extend(wrap_line(paragraph, max_width, measure));
    }
    lines
}

/// Default line height for a font size: `round(size * 1.2)`.
pub fn default_line_height(size: f32) -> f32 {
    (size * 1.2).round()
}

/// Number of whole lines that fit in `height`: `floor(height / line_height)`.
pub fn line_budget(height: f32, line_height: f32) -> usize {
    if line_height <= 0.0 {
        return 0;
    }
    (height / line_height).floor() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // 10pt per character, like a monospace strip
    fn measure(text: &str) -> f32 {
        text.chars().count() as f32 * 10.0
    }

    #[test]
    fn normalizes_carriage_returns() {
        assert_eq!(normalize_newlines("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(wrap_line("hello world", 200.0, &measure), vec!["hello world"]);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        // 12 chars max per line
        assert_eq!(
            wrap_line("the quick brown fox jumps", 120.0, &measure),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn oversized_word_gets_own_line() {
        assert_eq!(
            wrap_line("a incomprehensibilities b", 100.0, &measure),
            vec!["a", "incomprehensibilities", "b"]
        );
    }

    #[test]
    fn collapses_runs_of_whitespace() {
        assert_eq!(wrap_line("a   b\t c", 200.0, &measure), vec!["a b c"]);
    }

    #[test]
    fn empty_text_wraps_to_nothing() {
        assert_eq!(wrap_line("", 100.0, &measure), Vec::<String>::new());
        assert_eq!(wrap_line("   ", 100.0, &measure), Vec::<String>::new());
    }

    #[test]
    fn paragraphs_wrap_independently() {
        assert_eq!(
            wrap_paragraphs("one two\n\nthree four five", 100.0, &measure),
            vec!["one two", "", "three four", "five"]
        );
    }

    #[test]
    fn paragraphs_normalize_first() {
        assert_eq!(
            wrap_paragraphs("one\r\ntwo", 100.0, &measure),
            vec!["one", "two"]
        );
    }

    #[test]
    fn default_line_height_rounds() {
        assert_eq!(default_line_height(10.0), 12.0);
        assert_eq!(default_line_height(11.0), 13.0); // 13.2 rounds down
        assert_eq!(default_line_height(14.0), 17.0); // 16.8 rounds up
    }

    #[test]
    fn line_budget_floors() {
        assert_eq!(line_budget(40.0, 12.0), 3);
        assert_eq!(line_budget(36.0, 12.0), 3);
        assert_eq!(line_budget(11.0, 12.0), 0);
        assert_eq!(line_budget(100.0, 0.0), 0);
    }
}
