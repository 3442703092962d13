use core::ops::Range;
use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

use crate::font::{CaretMetrics, Font, FontId, FontMetrics, GlyphExtents};
use crate::glyph::item::{Analysis, Item};
use crate::glyph::{GlyphId, GlyphInfo, GlyphString};
use crate::layout::line_data::LineData;
use crate::layout::run::Run;
use crate::text::direction::Direction;
use crate::units::{Rect, SCALE};

/// A font with table-driven advances and metrics.
///
/// Each character maps to the glyph with the same code point. Characters
/// in the combining diacritical marks block, and any registered with
/// [`FixedFont::with_mark`], are zero-width marks. It also provides a
/// grapheme-per-cluster [`FixedFont::shape`] so lines can be assembled
/// without a shaping engine.
#[derive(Debug, Clone)]
pub struct FixedFont {
    id: FontId,
    metrics: FontMetrics,
    default_advance: i32,
    advances: HashMap<char, i32>,
    marks: HashSet<char>,
    missing: HashSet<char>,
    caret: Option<CaretMetrics>,
    ligature_carets: HashMap<GlyphId, Vec<i32>>,
}

impl FixedFont {
    pub fn new(id: FontId) -> Self {
        Self {
            id,
            metrics: FontMetrics {
                ascent: 12 * SCALE,
                descent: 4 * SCALE,
                height: 18 * SCALE,
                underline_position: -SCALE,
                underline_thickness: SCALE,
                strikethrough_position: 4 * SCALE,
                strikethrough_thickness: SCALE,
            },
            default_advance: 8 * SCALE,
            advances: HashMap::new(),
            marks: HashSet::new(),
            missing: HashSet::new(),
            caret: None,
            ligature_carets: HashMap::new(),
        }
    }

    pub fn with_metrics(mut self, ascent: i32, descent: i32, height: i32) -> Self {
        self.metrics.ascent = ascent;
        self.metrics.descent = descent;
        self.metrics.height = height;
        self
    }

    pub fn with_default_advance(mut self, advance: i32) -> Self {
        self.default_advance = advance;
        self
    }

    pub fn with_advance(mut self, ch: char, advance: i32) -> Self {
        self.advances.insert(ch, advance);
        self
    }

    pub fn with_mark(mut self, ch: char) -> Self {
        self.marks.insert(ch);
        self
    }

    /// Render `ch` with the unknown-glyph placeholder.
    pub fn with_missing(mut self, ch: char) -> Self {
        self.missing.insert(ch);
        self
    }

    pub fn with_caret(mut self, caret: CaretMetrics) -> Self {
        self.caret = Some(caret);
        self
    }

    pub fn with_ligature_carets(mut self, glyph: GlyphId, carets: Vec<i32>) -> Self {
        self.ligature_carets.insert(glyph, carets);
        self
    }

    pub fn default_advance(&self) -> i32 {
        self.default_advance
    }

    pub fn font_metrics(&self) -> FontMetrics {
        self.metrics
    }

    pub fn glyph_for(&self, ch: char) -> GlyphId {
        if self.missing.contains(&ch) {
            GlyphId::unknown(ch)
        } else {
            GlyphId(ch as u32)
        }
    }

    fn char_of(glyph: GlyphId) -> Option<char> {
        if glyph == GlyphId::EMPTY {
            return None;
        }
        char::from_u32(glyph.0 & !GlyphId::UNKNOWN_FLAG)
    }

    fn is_mark_char(&self, ch: char) -> bool {
        self.marks.contains(&ch) || ('\u{300}'..='\u{36f}').contains(&ch)
    }

    pub fn advance_of(&self, glyph: GlyphId) -> i32 {
        if glyph == GlyphId::EMPTY {
            return 0;
        }
        if glyph.is_unknown() {
            return self.default_advance;
        }
        match Self::char_of(glyph) {
            Some(ch) if self.is_mark_char(ch) => 0,
            Some(ch) => self.advances.get(&ch).copied().unwrap_or(self.default_advance),
            None => self.default_advance,
        }
    }

    /// Shape `range` of `data` into a run at bidi `level`, one cluster per
    /// grapheme. Right-to-left runs get their glyphs in visual order.
    pub fn shape(self: &Arc<Self>, data: &LineData, range: Range<usize>, level: u8) -> Run {
        let text = &data.text()[range.clone()];
        let font: Arc<dyn Font> = self.clone();

        let mut analysis = Analysis::from_attrs(font.clone(), level, data.attrs(), range.start);
        analysis.font = font;

        let mut glyphs = Vec::with_capacity(text.len());
        for (cluster, grapheme) in text.grapheme_indices(true) {
            for (i, ch) in grapheme.chars().enumerate() {
                let glyph = self.glyph_for(ch);
                glyphs.push(GlyphInfo::new(glyph, self.advance_of(glyph), cluster, i == 0));
            }
        }

        if analysis.is_rtl() {
            glyphs.reverse();
            let mut prev = None;
            for info in &mut glyphs {
                info.is_cluster_start = prev != Some(info.cluster);
                prev = Some(info.cluster);
            }
        }

        let item = Item::new(
            range.start,
            range.len(),
            data.char_offset(range.start),
            text.chars().count(),
            analysis,
        );
        Run::new(item, GlyphString::from_glyphs(glyphs))
    }
}

impl Font for FixedFont {
    fn id(&self) -> FontId {
        self.id
    }

    fn glyph_extents(&self, glyph: GlyphId) -> GlyphExtents {
        let advance = self.advance_of(glyph);
        let logical = Rect::new(
            0,
            -self.metrics.ascent,
            advance,
            self.metrics.ascent + self.metrics.descent,
        );
        let ink = match Self::char_of(glyph) {
            _ if glyph == GlyphId::EMPTY => Rect::default(),
            Some(ch) if !glyph.is_unknown() && ch.is_whitespace() => Rect::default(),
            Some(ch) if self.is_mark_char(ch) => {
                Rect::new(-self.default_advance / 2, -self.metrics.ascent, SCALE, SCALE)
            }
            _ => Rect::new(0, -self.metrics.ascent, advance, self.metrics.ascent),
        };
        GlyphExtents { ink, logical }
    }

    fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    fn caret_metrics(&self) -> Option<CaretMetrics> {
        self.caret
    }

    fn is_mark(&self, glyph: GlyphId) -> bool {
        Self::char_of(glyph).is_some_and(|ch| self.is_mark_char(ch))
    }

    fn ligature_caret(&self, glyph: GlyphId, _direction: Direction, caret_index: usize) -> Option<i32> {
        self.ligature_carets.get(&glyph)?.get(caret_index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advances_and_marks() {
        let font = FixedFont::new(FontId(1)).with_advance('i', 3 * SCALE);
        assert_eq!(font.advance_of(GlyphId('a' as u32)), 8 * SCALE);
        assert_eq!(font.advance_of(GlyphId('i' as u32)), 3 * SCALE);
        assert_eq!(font.advance_of(GlyphId(0x301)), 0);
        assert!(font.is_mark(GlyphId(0x301)));
        assert!(!font.is_mark(GlyphId(1)));
        assert!(font.glyph_extents(GlyphId(' ' as u32)).ink.is_empty());
    }

    #[test]
    fn test_missing_glyph() {
        let font = FixedFont::new(FontId(1)).with_missing('x');
        let glyph = font.glyph_for('x');
        assert!(glyph.is_unknown());
        assert_eq!(font.advance_of(glyph), font.default_advance());
    }

    #[test]
    fn test_shape_ltr_clusters_by_grapheme() {
        let font = Arc::new(FixedFont::new(FontId(1)));
        let data = LineData::from_text("xe\u{301}y");
        let run = font.shape(&data, 0..data.len(), 0);
        let glyphs = run.glyphs.glyphs();
        assert_eq!(glyphs.len(), 4);
        assert_eq!(
            glyphs.iter().map(|g| g.cluster).collect::<Vec<_>>(),
            vec![0, 1, 1, 4]
        );
        assert!(!glyphs[2].is_cluster_start);
        assert_eq!(run.width(), 3 * font.default_advance());
        assert_eq!(run.item.num_chars, 4);
    }

    #[test]
    fn test_shape_rtl_is_visual_order() {
        let font = Arc::new(FixedFont::new(FontId(1)));
        let data = LineData::from_text("אבג");
        let run = font.shape(&data, 2..6, 1);
        let clusters: Vec<_> = run.glyphs.glyphs().iter().map(|g| g.cluster).collect();
        assert_eq!(clusters, vec![2, 0]);
        assert_eq!(run.item.offset, 2);
        assert_eq!(run.item.char_offset, 1);
        assert!(run.item.analysis.is_rtl());
    }
}
