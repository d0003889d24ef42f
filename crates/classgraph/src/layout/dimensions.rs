//! Content-driven node sizing.

use crate::diagram::NodeDisplay;

/// Width of one header character
pub const HEADER_CHAR_WIDTH: f64 = 9.0;
/// Width of one member-line character
pub const LINE_CHAR_WIDTH: f64 = 7.0;
pub const HORIZONTAL_PADDING: f64 = 40.0;
pub const MIN_WIDTH: f64 = 150.0;

pub const HEADER_HEIGHT: f64 = 40.0;
/// Gap above the property and method sections
pub const SECTION_SPACING: f64 = 8.0;
pub const LINE_HEIGHT: f64 = 20.0;
pub const BOTTOM_PADDING: f64 = 8.0;
pub const MIN_HEIGHT: f64 = 60.0;

/// `(width, height)` of the box for `display`.
///
/// Width follows the widest of the header and member lines plus padding,
/// height stacks the header, each non-empty section and the bottom padding.
/// Both are clamped to their minimum.
pub fn calculate_node_dimensions(display: &NodeDisplay) -> (f64, f64) {
    let header_width = text_len(&display.header_text()) * HEADER_CHAR_WIDTH;
    let widest_line = display
        .properties
        .iter()
        .chain(display.methods.iter())
        .map(|line| text_len(line) * LINE_CHAR_WIDTH)
        .fold(0.0, f64::max);
    let width = (header_width.max(widest_line) + HORIZONTAL_PADDING).max(MIN_WIDTH);

    let mut height = HEADER_HEIGHT;
    if !display.properties.is_empty() {
        height += SECTION_SPACING + display.properties.len() as f64 * LINE_HEIGHT;
    }
    if !display.methods.is_empty() {
        height += SECTION_SPACING + display.methods.len() as f64 * LINE_HEIGHT;
    }
    height += BOTTOM_PADDING;

    (width, height.max(MIN_HEIGHT))
}

fn text_len(text: &str) -> f64 {
    text.chars().count() as f64
}
