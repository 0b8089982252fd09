//! Column width helpers for monospace tickets
//!
//! Widths are counted in characters, so accented names such as
//! "Jamón" occupy five columns.

/// Display width of a string in columns
pub fn text_width(s: &str) -> usize {
    s.chars().count()
}

/// Truncate a string to fit within a column width
pub fn truncate_text(s: &str, max_width: usize) -> String {
    s.chars().take(max_width).collect()
}

/// Pad a string to a specific column width
///
/// If the string is longer than the width, it will be truncated.
pub fn pad_text(s: &str, width: usize, align_right: bool) -> String {
    let current_width = text_width(s);
    if current_width >= width {
        return truncate_text(s, width);
    }
    let spaces = width - current_width;
    if align_right {
        format!("{}{}", " ".repeat(spaces), s)
    } else {
        format!("{}{}", s, " ".repeat(spaces))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_counts_chars() {
        assert_eq!(text_width("Jamón"), 5);
        assert_eq!(text_width(""), 0);
    }

    #[test]
    fn test_pad_and_truncate() {
        assert_eq!(pad_text("ab", 4, false), "ab  ");
        assert_eq!(pad_text("ab", 4, true), "  ab");
        assert_eq!(pad_text("abcdef", 4, false), "abcd");
        assert_eq!(truncate_text("Ñoquis", 3), "Ñoq");
    }
}
