//! Fixed-width text builder (for ticket rendering)

use crate::layout::text_width;

/// String-based ticket builder
///
/// Accumulates a plain UTF-8 document laid out for a monospace column
/// width. Alignment is done with spaces, so the output reads the same in a
/// text viewer as on a thermal roll.
pub struct TicketTextBuilder {
    buf: String,
    width: usize,
}

impl TicketTextBuilder {
    /// Create a new text builder with specified paper width in characters
    pub fn new(width: usize) -> Self {
        Self {
            buf: String::new(),
            width,
        }
    }

    /// Get the configured paper width
    pub fn width(&self) -> usize {
        self.width
    }

    // === Text Output ===

    /// Write raw text
    pub fn write(&mut self, s: &str) -> &mut Self {
        self.buf.push_str(s);
        self
    }

    /// Write text followed by newline
    pub fn write_line(&mut self, s: &str) -> &mut Self {
        self.buf.push_str(s);
        self.buf.push('\n');
        self
    }

    /// Empty line
    pub fn blank_line(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    // === Separators ===

    /// Print a line of '=' characters
    pub fn eq_sep(&mut self) -> &mut Self {
        self.write_line(&"=".repeat(self.width))
    }

    /// Print a line of '-' characters
    pub fn dash_sep(&mut self) -> &mut Self {
        self.write_line(&"-".repeat(self.width))
    }

    /// Dotted cut line with a centered label, e.g. `- - - CUT HERE - - -`
    pub fn cut_line(&mut self, label: &str) -> &mut Self {
        let label = format!(" {} ", label);
        let lw = text_width(&label);
        if lw >= self.width {
            return self.write_line(label.trim());
        }
        let side = (self.width - lw) / 2;
        let dashes = |n: usize| -> String {
            (0..n).map(|i| if i % 2 == 0 { '-' } else { ' ' }).collect()
        };
        let right = self.width - lw - side;
        let line = format!("{}{}{}", dashes(side), label, dashes(right));
        self.write_line(&line)
    }

    // === Layout Helpers ===

    /// Print text centered in the current line width
    pub fn text_center(&mut self, s: &str) -> &mut Self {
        let w = text_width(s);
        if w >= self.width {
            return self.write_line(s);
        }
        let left = (self.width - w) / 2;
        let line = format!("{}{}", " ".repeat(left), s);
        self.write_line(&line)
    }

    /// Print text flush right
    pub fn text_right(&mut self, s: &str) -> &mut Self {
        let w = text_width(s);
        if w >= self.width {
            return self.write_line(s);
        }
        let line = format!("{}{}", " ".repeat(self.width - w), s);
        self.write_line(&line)
    }

    /// Large centered text, letters spaced out (pickup numbers)
    pub fn text_large(&mut self, s: &str) -> &mut Self {
        let spaced = s
            .chars()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let framed = format!("[ {} ]", spaced);
        self.text_center(&framed)
    }

    /// Print left and right text on the same line
    pub fn line_lr(&mut self, left: &str, right: &str) -> &mut Self {
        let lw = text_width(left);
        let rw = text_width(right);

        if lw + rw >= self.width {
            self.write_line(&format!("{} {}", left, right));
        } else {
            let spaces = self.width - lw - rw;
            self.write(left);
            self.write(&" ".repeat(spaces));
            self.write_line(right);
        }
        self
    }

    /// Print a key-value pair (alias for line_lr)
    pub fn pair(&mut self, key: &str, value: &str) -> &mut Self {
        self.line_lr(key, value)
    }

    // === Build ===

    /// Finalize and return the accumulated string
    pub fn finalize(self) -> String {
        self.buf
    }

    /// Get the current buffer as a string reference
    pub fn as_str(&self) -> &str {
        &self.buf
    }
}

impl Default for TicketTextBuilder {
    fn default() -> Self {
        Self::new(48)
    }
}
