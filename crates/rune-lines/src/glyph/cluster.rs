use core::ops::Range;

use crate::glyph::{GlyphInfo, GlyphString};

/// One logical cluster of a glyph item.
///
/// Glyph positions follow the text direction: for left-to-right runs
/// `start_glyph < end_glyph` and the cluster covers `start_glyph..end_glyph`;
/// for right-to-left runs the walk goes downwards and `end_glyph` may be -1.
/// Byte indices and character counts are relative to the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cluster {
    pub start_glyph: isize,
    pub end_glyph: isize,
    pub start_index: usize,
    pub end_index: usize,
    pub start_char: usize,
    pub end_char: usize,
}

impl Cluster {
    /// The cluster's glyphs as a visual (ascending) range.
    pub fn glyph_range(&self) -> Range<usize> {
        if self.start_glyph <= self.end_glyph {
            self.start_glyph as usize..self.end_glyph as usize
        } else {
            (self.end_glyph + 1) as usize..(self.start_glyph + 1) as usize
        }
    }

    /// Leftmost and rightmost glyph of the cluster.
    pub fn visual_edges(&self) -> (usize, usize) {
        let range = self.glyph_range();
        (range.start, range.end - 1)
    }
}

/// Walks the logical clusters of a glyph string, forwards from the logical
/// start or backwards from the logical end.
#[derive(Debug, Clone)]
pub struct ClusterIter<'a> {
    glyphs: &'a [GlyphInfo],
    text: &'a str,
    num_chars: usize,
    ltr: bool,
    forward: bool,
    cur: Cluster,
}

impl<'a> ClusterIter<'a> {
    /// Iterate in logical order. `text` is the item text the glyphs were
    /// shaped from.
    pub fn new(glyphs: &'a GlyphString, text: &'a str, ltr: bool) -> Self {
        let glyphs = glyphs.glyphs();
        let edge = if ltr { 0 } else { glyphs.len() as isize - 1 };
        Self {
            glyphs,
            text,
            num_chars: text.chars().count(),
            ltr,
            forward: true,
            cur: Cluster {
                start_glyph: edge,
                end_glyph: edge,
                start_index: 0,
                end_index: 0,
                start_char: 0,
                end_char: 0,
            },
        }
    }

    /// Iterate in reverse logical order. For right-to-left runs this is
    /// left-to-right visual order.
    pub fn new_rev(glyphs: &'a GlyphString, text: &'a str, ltr: bool) -> Self {
        let glyphs = glyphs.glyphs();
        let num_chars = text.chars().count();
        let edge = if ltr { glyphs.len() as isize } else { -1 };
        Self {
            glyphs,
            text,
            num_chars,
            ltr,
            forward: false,
            cur: Cluster {
                start_glyph: edge,
                end_glyph: edge,
                start_index: text.len(),
                end_index: text.len(),
                start_char: num_chars,
                end_char: num_chars,
            },
        }
    }

    /// The cluster the iterator currently sits on.
    pub fn current(&self) -> Cluster {
        self.cur
    }

    fn cluster_at(&self, glyph: isize) -> usize {
        self.glyphs[glyph as usize].cluster
    }

    fn chars_between(&self, start: usize, end: usize) -> usize {
        self.text.get(start..end).map_or(0, |s| s.chars().count())
    }

    /// Advance to the next logical cluster.
    pub fn next_cluster(&mut self) -> bool {
        let n = self.glyphs.len() as isize;
        let mut glyph_index = self.cur.end_glyph;
        if (self.ltr && glyph_index == n) || (!self.ltr && glyph_index < 0) {
            return false;
        }

        self.cur.start_glyph = self.cur.end_glyph;
        self.cur.start_index = self.cur.end_index;
        self.cur.start_char = self.cur.end_char;

        let step = if self.ltr { 1 } else { -1 };
        let cluster = self.cluster_at(glyph_index);
        loop {
            glyph_index += step;
            if glyph_index == n || glyph_index < 0 {
                self.cur.end_index = self.text.len();
                self.cur.end_char = self.num_chars;
                break;
            }
            let next = self.cluster_at(glyph_index);
            if next > cluster {
                self.cur.end_index = next;
                self.cur.end_char += self.chars_between(self.cur.start_index, next);
                break;
            }
        }

        self.cur.end_glyph = glyph_index;
        true
    }

    /// Step back to the previous logical cluster.
    pub fn prev_cluster(&mut self) -> bool {
        let n = self.glyphs.len() as isize;
        let mut glyph_index = self.cur.start_glyph;
        if (self.ltr && glyph_index == 0) || (!self.ltr && glyph_index == n - 1) {
            return false;
        }

        self.cur.end_glyph = self.cur.start_glyph;
        self.cur.end_index = self.cur.start_index;
        self.cur.end_char = self.cur.start_char;

        let (step, boundary) = if self.ltr { (-1, 0) } else { (1, n - 1) };
        let cluster = self.cluster_at(glyph_index + step);
        loop {
            if glyph_index == boundary {
                self.cur.start_index = 0;
                self.cur.start_char = 0;
                break;
            }
            glyph_index += step;
            if self.cluster_at(glyph_index) < cluster {
                glyph_index -= step;
                self.cur.start_index = self.cluster_at(glyph_index);
                self.cur.start_char -= self.chars_between(self.cur.start_index, self.cur.end_index);
                break;
            }
        }

        self.cur.start_glyph = glyph_index;
        true
    }
}

impl Iterator for ClusterIter<'_> {
    type Item = Cluster;

    fn next(&mut self) -> Option<Cluster> {
        let moved = if self.forward {
            self.next_cluster()
        } else {
            self.prev_cluster()
        };
        moved.then_some(self.cur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::GlyphId;

    fn glyphs(clusters: &[usize]) -> GlyphString {
        let mut prev = None;
        clusters
            .iter()
            .map(|&c| {
                let start = prev != Some(c);
                prev = Some(c);
                GlyphInfo::new(GlyphId(1), 10, c, start)
            })
            .collect()
    }

    #[test]
    fn test_forward_ltr() {
        // "e\u{301}x": base + mark share cluster 0
        let g = glyphs(&[0, 0, 3]);
        let clusters: Vec<_> = ClusterIter::new(&g, "e\u{301}x", true).collect();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].glyph_range(), 0..2);
        assert_eq!((clusters[0].start_char, clusters[0].end_char), (0, 2));
        assert_eq!((clusters[1].start_index, clusters[1].end_index), (3, 4));
        assert_eq!((clusters[1].start_char, clusters[1].end_char), (2, 3));
    }

    #[test]
    fn test_forward_rtl() {
        // visual: c b a
        let g = glyphs(&[2, 1, 0]);
        let clusters: Vec<_> = ClusterIter::new(&g, "abc", false).collect();
        let ranges: Vec<_> = clusters.iter().map(|c| c.glyph_range()).collect();
        assert_eq!(ranges, vec![2..3, 1..2, 0..1]);
        assert_eq!(clusters[2].end_glyph, -1);
        assert_eq!(clusters[2].end_char, 3);
    }

    #[test]
    fn test_backward_rtl_is_visual_order() {
        let g = glyphs(&[2, 1, 0]);
        let clusters: Vec<_> = ClusterIter::new_rev(&g, "abc", false).collect();
        let ranges: Vec<_> = clusters.iter().map(|c| c.glyph_range()).collect();
        assert_eq!(ranges, vec![0..1, 1..2, 2..3]);
        assert_eq!((clusters[0].start_char, clusters[0].end_char), (2, 3));
        assert_eq!((clusters[2].start_char, clusters[2].end_char), (0, 1));
    }

    #[test]
    fn test_backward_ltr() {
        let g = glyphs(&[0, 1, 1, 3]);
        let clusters: Vec<_> = ClusterIter::new_rev(&g, "abcd", true).collect();
        let ranges: Vec<_> = clusters.iter().map(|c| c.glyph_range()).collect();
        assert_eq!(ranges, vec![3..4, 1..3, 0..1]);
        assert_eq!((clusters[1].start_index, clusters[1].end_index), (1, 3));
        assert_eq!(clusters[1].visual_edges(), (1, 2));
    }

    #[test]
    fn test_empty_glyph_string() {
        let g = GlyphString::new();
        assert_eq!(ClusterIter::new(&g, "", true).count(), 0);
        assert_eq!(ClusterIter::new(&g, "", false).count(), 0);
        assert_eq!(ClusterIter::new_rev(&g, "", true).count(), 0);
        assert_eq!(ClusterIter::new_rev(&g, "", false).count(), 0);
    }
}
