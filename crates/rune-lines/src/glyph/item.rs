use std::sync::Arc;

use crate::font::Font;
use crate::text::attrs::{AttrList, AttrValue};
use crate::text::direction::Direction;

/// Shaping analysis of an item: the font, the bidi embedding level and the
/// line-height properties that apply to its text.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub font: Arc<dyn Font>,
    /// Bidi embedding level; odd levels are right-to-left.
    pub level: u8,
    /// Line height as a multiple of the font height, 0 when unset.
    pub line_height: f64,
    /// Line height in layout units, 0 when unset.
    pub absolute_line_height: i32,
    /// Extra spacing added to the external leading.
    pub line_spacing: i32,
}

impl Analysis {
    pub fn new(font: Arc<dyn Font>, level: u8) -> Self {
        Self {
            font,
            level,
            line_height: 0.0,
            absolute_line_height: 0,
            line_spacing: 0,
        }
    }

    /// Resolve the analysis for text at byte `index`, picking up font and
    /// line-height attributes that cover it.
    pub fn from_attrs(default_font: Arc<dyn Font>, level: u8, attrs: &AttrList, index: usize) -> Self {
        let mut analysis = Self::new(default_font, level);
        for attr in attrs.attrs_at(index) {
            match &attr.value {
                AttrValue::Font(font) => analysis.font = font.clone(),
                AttrValue::LineHeight(factor) => analysis.line_height = *factor,
                AttrValue::AbsoluteLineHeight(height) => analysis.absolute_line_height = *height,
                AttrValue::LineSpacing(spacing) => analysis.line_spacing = *spacing,
            }
        }
        analysis
    }

    pub fn is_rtl(&self) -> bool {
        self.level % 2 == 1
    }

    pub fn direction(&self) -> Direction {
        Direction::from_level(self.level)
    }
}

/// A span of text shaped as a unit.
#[derive(Debug, Clone)]
pub struct Item {
    /// Byte offset of the item in the paragraph text.
    pub offset: usize,
    /// Length of the item in bytes.
    pub length: usize,
    /// Character offset of the item in the paragraph text.
    pub char_offset: usize,
    pub num_chars: usize,
    pub analysis: Analysis,
}

impl Item {
    pub fn new(
        offset: usize,
        length: usize,
        char_offset: usize,
        num_chars: usize,
        analysis: Analysis,
    ) -> Self {
        Self {
            offset,
            length,
            char_offset,
            num_chars,
            analysis,
        }
    }

    /// Byte offset one past the item.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    pub fn contains(&self, index: usize) -> bool {
        self.offset <= index && index < self.end()
    }
}
