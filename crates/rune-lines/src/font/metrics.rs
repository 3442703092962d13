/// Vertical font metrics in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the line box (positive).
    pub ascent: i32,
    /// Distance from the baseline to the bottom of the line box (positive).
    pub descent: i32,
    /// Recommended baseline-to-baseline distance.
    pub height: i32,
    pub underline_position: i32,
    pub underline_thickness: i32,
    pub strikethrough_position: i32,
    pub strikethrough_thickness: i32,
}

impl FontMetrics {
    /// External leading: the part of `height` not covered by ascent and descent.
    pub fn leading(&self) -> i32 {
        (self.height - (self.ascent + self.descent)).max(0)
    }
}

/// Caret slope metrics for italic and oblique faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretMetrics {
    pub rise: i32,
    pub run: i32,
    pub offset: i32,
    pub descender: i32,
    pub x_scale: i32,
    pub y_scale: i32,
}

impl CaretMetrics {
    /// Horizontal displacement per unit of height, or `None` for an upright caret.
    pub fn slope_inv(&self) -> Option<f64> {
        if self.rise == 0 || self.x_scale == 0 {
            return None;
        }
        Some((self.run as f64 * self.y_scale as f64) / (self.rise as f64 * self.x_scale as f64))
    }
}
