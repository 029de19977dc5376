//! Monospace text metrics for placing units without a layout engine.

/// Character box ratios relative to the font size.
#[derive(Clone, Debug, PartialEq)]
pub struct TextMetrics {
    /// Advance width as a ratio of font size (0.6 for common monospace faces)
    pub char_width_ratio: f64,
    /// Line height as a ratio of font size
    pub line_height_ratio: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width_ratio: 0.6,
            line_height_ratio: 1.15,
        }
    }
}

impl TextMetrics {
    #[inline]
    pub fn char_width(&self, font_size: f64) -> f64 {
        font_size * self.char_width_ratio
    }

    #[inline]
    pub fn line_height(&self, font_size: f64) -> f64 {
        font_size * self.line_height_ratio
    }

    /// Top-left corner of the cell at `column`, `line`.
    #[inline]
    pub fn cell_origin(&self, column: usize, line: usize, font_size: f64) -> (f64, f64) {
        (
            column as f64 * self.char_width(font_size),
            line as f64 * self.line_height(font_size),
        )
    }

    /// Size of a block of `columns` x `lines` cells.
    pub fn block_size(&self, columns: usize, lines: usize, font_size: f64) -> (f64, f64) {
        self.cell_origin(columns, lines, font_size)
    }
}
