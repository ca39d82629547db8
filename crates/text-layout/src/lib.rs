//! Pure text-layout algorithms: newline normalization, greedy
//! width-bounded word wrapping, and bullet-list formatting.
//!
//! Width measurement is injected as a closure (`Fn(&str) -> f32`, returning
//! points), so the algorithms carry no font machinery and can be tested with
//! synthetic measures.

mod bullets;
mod wrap;

pub use bullets::{wrap_bullets, BULLET_MARKER};
pub use wrap::{default_line_height, line_budget, normalize_newlines, wrap_line, wrap_paragraphs};
