use unicode_width::UnicodeWidthStr;

/// Spacing around the curve chart.
pub struct TextMetrics {
    pub line_height: f64,
    pub padding_x: f64,
    pub padding_y: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            line_height: 20.0,
            padding_x: 12.0,
            padding_y: 8.0,
        }
    }
}

/// Terminal columns taken by `text`; wide (CJK) characters count as two.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Pad `text` with spaces up to `width` columns.
pub fn pad_to(text: &str, width: usize) -> String {
    let mut out = text.to_string();
    for _ in display_width(text)..width {
        out.push(' ');
    }
    out
}

/// Convert a UTF-16 offset (as used by browser text inputs) to a byte offset.
pub fn utf16_to_byte_offset(text: &str, offset: usize) -> usize {
    let mut units = 0;
    for (i, c) in text.char_indices() {
        if units >= offset {
            return i;
        }
        units += c.len_utf16();
    }
    text.len()
}

pub fn byte_to_utf16_offset(text: &str, offset: usize) -> usize {
    text.char_indices()
        .take_while(|(i, _)| *i < offset)
        .map(|(_, c)| c.len_utf16())
        .sum()
}
