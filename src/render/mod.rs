//! Presentation layer: forecast charts and the trip map

pub mod chart;
pub mod map;

pub use chart::{chart_title, render_chart};
pub use map::{MarkerColor, render_map_html, save_map};

/// Escape text for use inside HTML or SVG element content and attributes
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
