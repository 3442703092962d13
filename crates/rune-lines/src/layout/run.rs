use bitflags::bitflags;

use crate::context::Context;
use crate::glyph::item::Item;
use crate::glyph::GlyphString;
use crate::layout::line_data::LineData;
use crate::text::direction::Direction;
use crate::units::Rect;

bitflags! {
    /// Which halves of the external leading to drop from logical extents.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LeadingTrim: u8 {
        const START = 0b01;
        const END   = 0b10;
        const BOTH  = Self::START.bits() | Self::END.bits();
    }
}

impl LeadingTrim {
    pub const NONE: LeadingTrim = LeadingTrim::empty();
}

/// Add `leading` to a logical rectangle, half above and half below,
/// minus the halves that `trim` drops.
pub(crate) fn apply_leading(rect: &mut Rect, leading: i32, trim: LeadingTrim) {
    if !trim.contains(LeadingTrim::START) {
        rect.y -= leading / 2;
    }
    if trim == LeadingTrim::NONE {
        rect.height += leading;
    } else {
        rect.height += leading - leading / 2;
    }
}

/// A shaped item placed on a line.
#[derive(Debug, Clone)]
pub struct Run {
    pub item: Item,
    pub glyphs: GlyphString,
    /// Baseline shift; positive values raise the run.
    pub y_offset: i32,
    /// Extra space before the run's first glyph.
    pub start_x_offset: i32,
    /// Extra space after the run's last glyph.
    pub end_x_offset: i32,
}

impl Run {
    pub fn new(item: Item, glyphs: GlyphString) -> Self {
        Self {
            item,
            glyphs,
            y_offset: 0,
            start_x_offset: 0,
            end_x_offset: 0,
        }
    }

    /// The run's slice of the paragraph text.
    pub fn text<'a>(&self, data: &'a LineData) -> &'a str {
        &data.text()[self.item.offset..self.item.end()]
    }

    pub fn width(&self) -> i32 {
        self.glyphs.width()
    }

    pub fn level(&self) -> u8 {
        self.item.analysis.level
    }

    pub fn direction(&self) -> Direction {
        self.item.analysis.direction()
    }

    /// Ink and logical extents relative to the run's origin on the line's
    /// baseline. Logical extents include external leading unless `trim`
    /// removes it.
    pub fn extents(&self, context: &Context, trim: LeadingTrim) -> (Rect, Rect) {
        let analysis = &self.item.analysis;
        let (mut ink, mut logical) = self.glyphs.extents(analysis.font.as_ref());

        ink.y -= self.y_offset;
        logical.y -= self.y_offset;

        if trim != LeadingTrim::BOTH {
            let leading = if analysis.absolute_line_height != 0 || analysis.line_height != 0.0 {
                let line_height = analysis
                    .absolute_line_height
                    .max((analysis.line_height * logical.height as f64).ceil() as i32);
                line_height - logical.height
            } else {
                let metrics = context.metrics(analysis.font.as_ref());
                (metrics.height - (metrics.ascent + metrics.descent) + analysis.line_spacing).max(0)
            };
            apply_leading(&mut logical, leading, trim);
        }

        (ink, logical)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::font::fixed::FixedFont;
    use crate::font::{Font, FontId};
    use crate::units::SCALE;

    fn setup() -> (Arc<FixedFont>, Context, LineData) {
        let font = Arc::new(
            FixedFont::new(FontId(1)).with_metrics(10 * SCALE, 4 * SCALE, 18 * SCALE),
        );
        let ctx = Context::new(font.clone());
        let data = LineData::from_text("abc");
        (font, ctx, data)
    }

    #[test]
    fn test_leading_trim_constants() {
        assert_eq!(LeadingTrim::BOTH, LeadingTrim::START | LeadingTrim::END);
        assert!(LeadingTrim::NONE.is_empty());
    }

    #[test]
    fn test_extents_split_leading() {
        let (font, ctx, data) = setup();
        let run = font.shape(&data, 0..3, 0);

        let (_, trimmed) = run.extents(&ctx, LeadingTrim::BOTH);
        assert_eq!(trimmed.y, -10 * SCALE);
        assert_eq!(trimmed.height, 14 * SCALE);
        assert_eq!(trimmed.width, run.width());

        // 4px of leading, 2px above and 2px below
        let (_, full) = run.extents(&ctx, LeadingTrim::NONE);
        assert_eq!(full.y, -12 * SCALE);
        assert_eq!(full.height, 18 * SCALE);

        let (_, start_trimmed) = run.extents(&ctx, LeadingTrim::START);
        assert_eq!(start_trimmed.y, -10 * SCALE);
        assert_eq!(start_trimmed.height, 16 * SCALE);
    }

    #[test]
    fn test_extents_y_offset_raises_run() {
        let (font, ctx, data) = setup();
        let mut run = font.shape(&data, 0..3, 0);
        run.y_offset = 3 * SCALE;
        let (ink, logical) = run.extents(&ctx, LeadingTrim::BOTH);
        assert_eq!(logical.y, -13 * SCALE);
        assert_eq!(ink.y, -13 * SCALE);
    }

    #[test]
    fn test_extents_line_height_factor() {
        let (font, ctx, data) = setup();
        let mut run = font.shape(&data, 0..3, 0);
        run.item.analysis.line_height = 2.0;
        let (_, logical) = run.extents(&ctx, LeadingTrim::NONE);
        assert_eq!(logical.height, 28 * SCALE);
        assert_eq!(logical.y, -17 * SCALE);
        assert_eq!(run.direction(), Direction::Ltr);
        assert_eq!(run.item.analysis.font.id(), FontId(1));
    }
}
