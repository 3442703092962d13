//! Shaped glyph strings and the geometry queries the line core needs from
//! them.

pub mod cluster;
pub mod item;

use crate::font::Font;
use crate::glyph::cluster::ClusterIter;
use crate::glyph::item::Analysis;
use crate::text::log_attrs::LogAttr;
use crate::units::Rect;

/// Glyph index in a font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GlyphId(pub u32);

impl GlyphId {
    /// A glyph that draws nothing.
    pub const EMPTY: GlyphId = GlyphId(0x0FFF_FFFF);
    /// Set on glyphs that stand in for characters the font cannot render.
    pub const UNKNOWN_FLAG: u32 = 0x1000_0000;

    /// The placeholder glyph for a character missing from the font.
    pub fn unknown(ch: char) -> Self {
        GlyphId(ch as u32 | Self::UNKNOWN_FLAG)
    }

    pub fn is_unknown(&self) -> bool {
        self.0 & Self::UNKNOWN_FLAG != 0
    }
}

/// Positioning of one glyph, in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphGeometry {
    /// Advance width.
    pub width: i32,
    pub x_offset: i32,
    pub y_offset: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphInfo {
    pub glyph: GlyphId,
    pub geometry: GlyphGeometry,
    /// Set on the first visual glyph of each cluster.
    pub is_cluster_start: bool,
    /// Byte offset of the glyph's cluster, relative to the owning item.
    pub cluster: usize,
}

impl GlyphInfo {
    pub fn new(glyph: GlyphId, width: i32, cluster: usize, is_cluster_start: bool) -> Self {
        Self {
            glyph,
            geometry: GlyphGeometry {
                width,
                ..Default::default()
            },
            is_cluster_start,
            cluster,
        }
    }
}

/// Glyphs of one run in visual order.
///
/// For right-to-left runs the glyph order is the reverse of the text order,
/// so `cluster` values decrease from left to right.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlyphString {
    glyphs: Vec<GlyphInfo>,
}

impl FromIterator<GlyphInfo> for GlyphString {
    fn from_iter<T: IntoIterator<Item = GlyphInfo>>(iter: T) -> Self {
        Self {
            glyphs: iter.into_iter().collect(),
        }
    }
}

impl GlyphString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_glyphs(glyphs: Vec<GlyphInfo>) -> Self {
        Self { glyphs }
    }

    pub fn push(&mut self, info: GlyphInfo) {
        self.glyphs.push(info);
    }

    pub fn glyphs(&self) -> &[GlyphInfo] {
        &self.glyphs
    }

    pub fn glyphs_mut(&mut self) -> &mut [GlyphInfo] {
        &mut self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Sum of all advance widths.
    pub fn width(&self) -> i32 {
        self.glyphs.iter().map(|g| g.geometry.width).sum()
    }

    /// Index of the glyph that starts the cluster following the one at
    /// `cluster_start`, or `len()` when it is the last.
    pub fn next_cluster_start(&self, cluster_start: usize) -> usize {
        (cluster_start + 1..self.glyphs.len())
            .find(|&i| self.glyphs[i].is_cluster_start)
            .unwrap_or(self.glyphs.len())
    }

    /// Width of the cluster starting at glyph `cluster_start`.
    pub fn cluster_width(&self, cluster_start: usize) -> i32 {
        let end = self.next_cluster_start(cluster_start);
        self.glyphs[cluster_start..end]
            .iter()
            .map(|g| g.geometry.width)
            .sum()
    }

    /// Ink and logical extents of glyphs `start..end`, with x measured from
    /// the left edge of glyph `start`.
    pub fn extents_range(&self, start: usize, end: usize, font: &dyn Font) -> (Rect, Rect) {
        let mut ink = Rect::default();
        let mut logical = Rect::default();
        let mut x_pos = 0;

        for (i, info) in self.glyphs[start..end].iter().enumerate() {
            let extents = font.glyph_extents(info.glyph);
            let geometry = &info.geometry;

            if !extents.ink.is_empty() {
                let glyph_ink = Rect::new(
                    x_pos + extents.ink.x + geometry.x_offset,
                    extents.ink.y + geometry.y_offset,
                    extents.ink.width,
                    extents.ink.height,
                );
                ink = ink.union_ink(&glyph_ink);
            }

            logical.width += geometry.width;
            if i == 0 {
                logical.y = extents.logical.y;
                logical.height = extents.logical.height;
            } else {
                let y = logical.y.min(extents.logical.y);
                logical.height = logical.bottom().max(extents.logical.bottom()) - y;
                logical.y = y;
            }

            x_pos += geometry.width;
        }

        (ink, logical)
    }

    pub fn extents(&self, font: &dyn Font) -> (Rect, Rect) {
        self.extents_range(0, self.glyphs.len(), font)
    }

    /// Width of each character of `text`, the item text these glyphs were
    /// shaped from. A cluster's width is split evenly between its
    /// characters, with the remainder given to the first.
    pub fn logical_widths(&self, text: &str, level: u8) -> Vec<i32> {
        let mut widths = vec![0; text.chars().count()];
        for cluster in ClusterIter::new(self, text, level % 2 == 0) {
            let cluster_width: i32 = self.glyphs[cluster.glyph_range()]
                .iter()
                .map(|g| g.geometry.width)
                .sum();
            let num_chars = cluster.end_char - cluster.start_char;
            if num_chars == 0 {
                continue;
            }
            let char_width = cluster_width / num_chars as i32;
            for w in &mut widths[cluster.start_char..cluster.end_char] {
                *w = char_width;
            }
            widths[cluster.start_char] += cluster_width - char_width * num_chars as i32;
        }
        widths
    }

    /// X position of the leading (or trailing) edge of the character at byte
    /// `index` of `text`, measured from the left edge of the run.
    ///
    /// Positions inside a cluster are taken from the font's ligature carets
    /// when the cluster holds a single spacing glyph, and otherwise
    /// interpolated evenly across the cluster. When `attrs` is given, only
    /// cursor positions count as stops inside a cluster.
    pub fn index_to_x(
        &self,
        text: &str,
        analysis: &Analysis,
        attrs: Option<&[LogAttr]>,
        index: usize,
        trailing: bool,
    ) -> i32 {
        if self.glyphs.is_empty() {
            return 0;
        }

        let rtl = analysis.is_rtl();
        let mut start_xpos = 0;
        let mut end_xpos = 0;
        let mut start_index: Option<usize> = None;
        let mut end_index: Option<usize> = None;
        let mut start_glyph_pos: Option<usize> = None;
        let mut end_glyph_pos: Option<usize> = None;

        if rtl {
            let mut width = self.width();
            for info in self.glyphs.iter().rev() {
                if info.cluster > index {
                    end_index = Some(info.cluster);
                    end_xpos = width;
                    break;
                }
                if start_index != Some(info.cluster) {
                    start_index = Some(info.cluster);
                    start_xpos = width;
                }
                width -= info.geometry.width;
            }
            for (i, info) in self.glyphs.iter().enumerate().rev() {
                if Some(info.cluster) == start_index {
                    if end_glyph_pos.is_none() {
                        end_glyph_pos = Some(i);
                    }
                    start_glyph_pos = Some(i);
                }
            }
        } else {
            let mut width = 0;
            for info in &self.glyphs {
                if info.cluster > index {
                    end_index = Some(info.cluster);
                    end_xpos = width;
                    break;
                }
                if start_index != Some(info.cluster) {
                    start_index = Some(info.cluster);
                    start_xpos = width;
                }
                width += info.geometry.width;
            }
            for (i, info) in self.glyphs.iter().enumerate() {
                if Some(info.cluster) == start_index {
                    if start_glyph_pos.is_none() {
                        start_glyph_pos = Some(i);
                    }
                    end_glyph_pos = Some(i);
                }
            }
        }

        let start_index = start_index.unwrap_or(0);
        let end_index = match end_index {
            Some(end) => end,
            None => {
                end_xpos = if rtl { 0 } else { self.width() };
                text.len()
            }
        };

        let mut cluster_chars = 0usize;
        let mut cluster_offset = 0usize;
        let mut attr_pos = attrs.map_or(0, |_| text[..start_index].chars().count());
        for (p, _) in text.get(start_index..end_index).unwrap_or("").char_indices() {
            let skip = attrs.is_some_and(|a| !a[attr_pos].is_cursor_position);
            attr_pos += 1;
            if skip {
                continue;
            }
            if start_index + p < index {
                cluster_offset += 1;
            }
            cluster_chars += 1;
        }

        if trailing {
            cluster_offset = (cluster_offset + 1).min(cluster_chars);
        }

        if cluster_chars == 0 {
            return start_xpos;
        }

        if cluster_offset > 0 && cluster_offset < cluster_chars {
            if let (Some(first), Some(last)) = (start_glyph_pos, end_glyph_pos) {
                if let Some(x) =
                    self.ligature_caret_x(analysis, first, last, cluster_offset - 1, start_xpos, end_xpos)
                {
                    return x;
                }
            }
        }

        let chars = cluster_chars as i64;
        let offset = cluster_offset as i64;
        (((chars - offset) * start_xpos as i64 + offset * end_xpos as i64) / chars) as i32
    }

    fn ligature_caret_x(
        &self,
        analysis: &Analysis,
        first: usize,
        last: usize,
        caret_index: usize,
        start_xpos: i32,
        end_xpos: i32,
    ) -> Option<i32> {
        let font = analysis.font.as_ref();
        let glyph_pos = if first == last {
            first
        } else {
            let mut spacing = (first..=last).filter(|&i| !font.is_mark(self.glyphs[i].glyph));
            let pos = spacing.next()?;
            if spacing.next().is_some() {
                return None;
            }
            pos
        };

        let info = &self.glyphs[glyph_pos];
        let caret = font.ligature_caret(info.glyph, analysis.direction(), caret_index)?;
        let base = if analysis.is_rtl() { end_xpos } else { start_xpos };
        Some(base + caret + info.geometry.x_offset)
    }

    /// Byte index into `text` of the character under `x` (measured from the
    /// left edge of the run), and whether `x` falls on its trailing half.
    ///
    /// The result is a character, not necessarily a cursor position; callers
    /// combine it with log attrs.
    pub fn x_to_index(&self, text: &str, analysis: &Analysis, x: i32) -> (usize, bool) {
        let rtl = analysis.is_rtl();
        let mut start_xpos = 0;
        let mut end_xpos = 0;
        let mut start_index: Option<usize> = None;
        let mut end_index: Option<usize> = None;
        let mut found = false;

        if rtl {
            let mut width = self.width();
            for info in self.glyphs.iter().rev() {
                if start_index != Some(info.cluster) {
                    if found {
                        end_index = Some(info.cluster);
                        end_xpos = width;
                        break;
                    }
                    start_index = Some(info.cluster);
                    start_xpos = width;
                }
                width -= info.geometry.width;
                if width <= x && x < width + info.geometry.width {
                    found = true;
                }
            }
        } else {
            let mut width = 0;
            for info in &self.glyphs {
                if start_index != Some(info.cluster) {
                    if found {
                        end_index = Some(info.cluster);
                        end_xpos = width;
                        break;
                    }
                    start_index = Some(info.cluster);
                    start_xpos = width;
                }
                if width <= x && x < width + info.geometry.width {
                    found = true;
                }
                width += info.geometry.width;
            }
        }

        let Some(start_index) = start_index else {
            return (0, false);
        };
        let end_index = match end_index {
            Some(end) => end,
            None => {
                end_xpos = if rtl { 0 } else { self.width() };
                text.len()
            }
        };

        let cluster_text = text.get(start_index..end_index).unwrap_or("");
        let cluster_chars = cluster_text.chars().count();

        if start_xpos == end_xpos {
            return (start_index, false);
        }

        let cp = ((x - start_xpos) as f64 * cluster_chars as f64) / (end_xpos - start_xpos) as f64;
        let ltr_edge = start_xpos < end_xpos;

        let mut index = start_index;
        let mut i = 0usize;
        for (p, ch) in cluster_text.char_indices() {
            let step = if ltr_edge {
                (i + 1) as f64 <= cp
            } else {
                ((i + 1) as f64) < cp
            };
            if !step {
                break;
            }
            index = start_index + p + ch.len_utf8();
            i += 1;
        }

        let trailing = if ltr_edge {
            cp - cp.trunc() >= 0.5
        } else {
            let flipped = cluster_chars as f64 - cp;
            flipped - flipped.trunc() < 0.5
        };

        (index, trailing)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::font::fixed::FixedFont;
    use crate::font::FontId;
    use crate::units::SCALE;

    fn ltr_analysis() -> Analysis {
        Analysis::new(Arc::new(FixedFont::new(FontId(1))), 0)
    }

    fn rtl_analysis() -> Analysis {
        Analysis::new(Arc::new(FixedFont::new(FontId(1))), 1)
    }

    fn simple(widths: &[i32], clusters: &[usize]) -> GlyphString {
        let mut prev = None;
        widths
            .iter()
            .zip(clusters)
            .enumerate()
            .map(|(i, (&w, &c))| {
                let start = prev != Some(c);
                prev = Some(c);
                GlyphInfo::new(GlyphId(i as u32 + 1), w, c, start)
            })
            .collect()
    }

    #[test]
    fn test_width_and_clusters() {
        let glyphs = simple(&[10, 0, 20], &[0, 0, 2]);
        assert_eq!(glyphs.width(), 30);
        assert_eq!(glyphs.next_cluster_start(0), 2);
        assert_eq!(glyphs.next_cluster_start(2), 3);
        assert_eq!(glyphs.cluster_width(0), 10);
    }

    #[test]
    fn test_index_to_x_ltr() {
        let glyphs = simple(&[10, 10, 10], &[0, 1, 2]);
        let a = ltr_analysis();
        assert_eq!(glyphs.index_to_x("abc", &a, None, 0, false), 0);
        assert_eq!(glyphs.index_to_x("abc", &a, None, 1, false), 10);
        assert_eq!(glyphs.index_to_x("abc", &a, None, 1, true), 20);
        assert_eq!(glyphs.index_to_x("abc", &a, None, 2, true), 30);
    }

    #[test]
    fn test_index_to_x_rtl() {
        // visual order: c b a
        let glyphs = simple(&[10, 10, 10], &[2, 1, 0]);
        let a = rtl_analysis();
        assert_eq!(glyphs.index_to_x("abc", &a, None, 0, false), 30);
        assert_eq!(glyphs.index_to_x("abc", &a, None, 0, true), 20);
        assert_eq!(glyphs.index_to_x("abc", &a, None, 2, true), 0);
    }

    #[test]
    fn test_index_to_x_interpolates_inside_cluster() {
        // one glyph for the "ffi" ligature
        let glyphs = simple(&[30], &[0]);
        let a = ltr_analysis();
        assert_eq!(glyphs.index_to_x("ffi", &a, None, 1, false), 10);
        assert_eq!(glyphs.index_to_x("ffi", &a, None, 2, false), 20);
    }

    #[test]
    fn test_index_to_x_uses_ligature_carets() {
        let font = FixedFont::new(FontId(3)).with_ligature_carets(GlyphId(1), vec![7, 19]);
        let a = Analysis::new(Arc::new(font), 0);
        let glyphs = simple(&[30], &[0]);
        assert_eq!(glyphs.index_to_x("ffi", &a, None, 1, false), 7);
        assert_eq!(glyphs.index_to_x("ffi", &a, None, 2, false), 19);
    }

    #[test]
    fn test_index_to_x_respects_cursor_positions() {
        // "e" + combining acute is one cursor stop, so no interpolation stop inside
        let text = "e\u{301}x";
        let glyphs = simple(&[10, 0, 10], &[0, 0, 3]);
        let attrs = crate::text::log_attrs::compute_log_attrs(text);
        let a = ltr_analysis();
        assert_eq!(glyphs.index_to_x(text, &a, Some(&attrs), 0, true), 10);
        assert_eq!(glyphs.index_to_x(text, &a, None, 0, true), 5);
    }

    #[test]
    fn test_x_to_index_ltr() {
        let glyphs = simple(&[10, 10, 10], &[0, 1, 2]);
        let a = ltr_analysis();
        assert_eq!(glyphs.x_to_index("abc", &a, 3), (0, false));
        assert_eq!(glyphs.x_to_index("abc", &a, 7), (0, true));
        assert_eq!(glyphs.x_to_index("abc", &a, 21), (2, false));
    }

    #[test]
    fn test_x_to_index_rtl() {
        let glyphs = simple(&[10, 10, 10], &[2, 1, 0]);
        let a = rtl_analysis();
        // rightmost glyph is "a"
        assert_eq!(glyphs.x_to_index("abc", &a, 28), (0, false));
        assert_eq!(glyphs.x_to_index("abc", &a, 22), (0, true));
        assert_eq!(glyphs.x_to_index("abc", &a, 2), (2, true));
    }

    #[test]
    fn test_x_to_index_inside_ligature() {
        let glyphs = simple(&[30], &[0]);
        let a = ltr_analysis();
        assert_eq!(glyphs.x_to_index("ffi", &a, 12), (1, false));
        assert_eq!(glyphs.x_to_index("ffi", &a, 18), (1, true));
    }

    #[test]
    fn test_logical_widths_split_clusters() {
        let glyphs = simple(&[31, 10], &[0, 2]);
        assert_eq!(glyphs.logical_widths("ffx", 0), vec![16, 15, 10]);
    }

    #[test]
    fn test_extents_range() {
        let font = FixedFont::new(FontId(1));
        let advance = font.default_advance();
        let glyphs: GlyphString = "ab"
            .char_indices()
            .map(|(i, c)| GlyphInfo::new(GlyphId(c as u32), advance, i, true))
            .collect();
        let (ink, logical) = glyphs.extents(&font);
        let m = font.font_metrics();
        assert_eq!(logical, Rect::new(0, -m.ascent, 2 * advance, m.ascent + m.descent));
        assert_eq!(ink.x, 0);
        assert_eq!(ink.width, 2 * advance);

        let (_, second) = glyphs.extents_range(1, 2, &font);
        assert_eq!(second.width, advance);
        assert!(advance > SCALE);
    }

    #[test]
    fn test_unknown_flag() {
        let g = GlyphId::unknown('x');
        assert!(g.is_unknown());
        assert!(!GlyphId('x' as u32).is_unknown());
    }
}
