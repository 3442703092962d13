//! Visual-order traversal of a [`Lines`] container.
//!
//! The iterator moves through four nested levels (line, run, cluster and
//! character) and keeps running x positions so extents come out in
//! container coordinates without re-measuring earlier content. Every line
//! ends with a virtual empty run, [`RunSlot::LineEnd`], so even a line
//! without runs yields a position.

use tracing::warn;

use crate::layout::line::Line;
use crate::layout::lines::Lines;
use crate::layout::run::{LeadingTrim, Run};
use crate::units::Rect;

/// The iterator's current run.
#[derive(Debug, Clone, Copy)]
pub enum RunSlot<'a> {
    Run(&'a Run),
    /// The virtual run after the last real run of a line.
    LineEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Run(usize),
    LineEnd,
}

#[derive(Debug, Clone)]
pub struct LineIter<'a> {
    lines: &'a Lines,
    serial: u32,

    line_no: usize,
    line_x: i32,
    line_y: i32,

    slot: Slot,
    /// Byte index of the current character.
    index: usize,
    run_x: i32,
    run_width: i32,
    end_x_offset: i32,
    ltr: bool,

    cluster_x: i32,
    cluster_width: i32,
    /// Glyph index where the current cluster starts.
    cluster_start: usize,
    next_cluster_glyph: usize,
    cluster_num_chars: usize,
    /// Character offset inside the current cluster.
    character_position: usize,
}

impl<'a> LineIter<'a> {
    /// Position a new iterator on the first line, or `None` when there are
    /// no lines.
    pub fn new(lines: &'a Lines) -> Option<Self> {
        let first = lines.lines.first()?;
        let (slot, start_index) = match first.line.runs().first() {
            Some(run) => (Slot::Run(0), run.item.offset),
            None => (Slot::LineEnd, first.line.start_index()),
        };

        let mut iter = Self {
            lines,
            serial: lines.serial(),
            line_no: 0,
            line_x: first.x,
            line_y: first.y,
            slot,
            index: start_index,
            run_x: 0,
            run_width: 0,
            end_x_offset: 0,
            ltr: true,
            cluster_x: 0,
            cluster_width: 0,
            cluster_start: 0,
            next_cluster_glyph: 0,
            cluster_num_chars: 0,
            character_position: 0,
        };
        iter.update_run(start_index);
        Some(iter)
    }

    /// Whether the container is unchanged since the iterator was created.
    pub fn is_valid(&self) -> bool {
        self.serial == self.lines.serial()
    }

    fn check_valid(&self) {
        if !self.is_valid() {
            warn!(
                iter_serial = self.serial,
                lines_serial = self.lines.serial(),
                "stale line iterator"
            );
        }
        debug_assert!(self.is_valid(), "lines changed under the iterator");
    }

    pub fn lines(&self) -> &'a Lines {
        self.lines
    }

    pub fn line(&self) -> &'a Line {
        &self.lines.lines[self.line_no].line
    }

    pub fn line_no(&self) -> usize {
        self.line_no
    }

    pub fn run(&self) -> RunSlot<'a> {
        match self.slot {
            Slot::Run(i) => RunSlot::Run(&self.line().runs()[i]),
            Slot::LineEnd => RunSlot::LineEnd,
        }
    }

    fn current_run(&self) -> Option<&'a Run> {
        match self.slot {
            Slot::Run(i) => self.line().runs().get(i),
            Slot::LineEnd => None,
        }
    }

    /// Byte index of the current position.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn at_last_line(&self) -> bool {
        self.line_no + 1 == self.lines.line_count()
    }

    fn line_is_terminated(&self) -> bool {
        !self.at_last_line() && self.line().is_paragraph_end()
    }

    fn update_run(&mut self, start_index: usize) {
        let line = self.line();
        let run = self.current_run();

        if self.slot == Slot::Run(0) || line.runs().is_empty() {
            self.run_x = 0;
        } else {
            self.run_x += self.end_x_offset + self.run_width;
            if let Some(run) = run {
                self.run_x += run.start_x_offset;
            }
        }

        match run {
            Some(run) => {
                self.run_width = run.width();
                self.end_x_offset = run.end_x_offset;
                self.ltr = !run.item.analysis.is_rtl();
            }
            None => {
                self.run_width = 0;
                self.end_x_offset = 0;
                self.ltr = true;
            }
        }

        self.cluster_start = 0;
        self.cluster_x = self.run_x;

        match run {
            Some(run) => {
                let first_cluster = run.glyphs.glyphs().first().map_or(0, |g| g.cluster);
                self.update_cluster(first_cluster);
            }
            None => {
                self.cluster_width = 0;
                self.character_position = 0;
                self.cluster_num_chars = 0;
                self.index = start_index;
            }
        }
    }

    /// `cluster_start_index` is the cluster's byte offset within its item.
    fn update_cluster(&mut self, cluster_start_index: usize) {
        let Some(run) = self.current_run() else {
            return;
        };
        let glyphs = run.glyphs.glyphs();

        self.character_position = 0;
        self.cluster_width = run.glyphs.cluster_width(self.cluster_start);
        self.next_cluster_glyph = run.glyphs.next_cluster_start(self.cluster_start);

        let cluster_end = if self.ltr {
            glyphs
                .get(self.next_cluster_glyph)
                .map_or(run.item.length, |g| g.cluster)
        } else {
            // The next logical cluster is the previous visual one.
            let mut i = self.cluster_start;
            while i > 0 && glyphs[i - 1].cluster == cluster_start_index {
                i -= 1;
            }
            if i == 0 {
                run.item.length
            } else {
                glyphs[i - 1].cluster
            }
        };
        let cluster_length = cluster_end.saturating_sub(cluster_start_index);

        let data = self.line().data();
        let text_start = run.item.offset + cluster_start_index;
        let text_end = text_start + cluster_length;
        self.cluster_num_chars = data
            .text()
            .get(text_start..text_end)
            .map_or(0, |s| s.chars().count());

        self.index = if self.ltr {
            text_start
        } else {
            data.prev_char(text_end)
        };
    }

    /// Move to the start of the next line. Returns false on the last line,
    /// leaving the iterator where it was.
    pub fn next_line(&mut self) -> bool {
        self.check_valid();

        let next = self.line_no + 1;
        let Some(placed) = self.lines.lines.get(next) else {
            return false;
        };

        self.line_no = next;
        self.line_x = placed.x;
        self.line_y = placed.y;
        let start_index = match placed.line.runs().first() {
            Some(run) => {
                self.slot = Slot::Run(0);
                run.item.offset
            }
            None => {
                self.slot = Slot::LineEnd;
                placed.line.start_index()
            }
        };
        self.update_run(start_index);
        true
    }

    /// Move to the next run, including the virtual run at each line end.
    pub fn next_run(&mut self) -> bool {
        self.check_valid();

        let Slot::Run(i) = self.slot else {
            return self.next_line();
        };
        let runs = self.line().runs();
        let start_index = match runs.get(i + 1) {
            Some(next) => {
                self.slot = Slot::Run(i + 1);
                next.item.offset
            }
            None => {
                self.slot = Slot::LineEnd;
                runs[i].item.end()
            }
        };
        self.update_run(start_index);
        true
    }

    /// Move to the next cluster, skipping line ends.
    pub fn next_cluster(&mut self) -> bool {
        self.check_valid();
        self.next_cluster_internal(false)
    }

    /// Move to the next character. Line ends count as characters only when
    /// they terminate a paragraph; a CRLF terminator yields two stops.
    pub fn next_char(&mut self) -> bool {
        self.check_valid();

        if self.slot == Slot::LineEnd {
            let line = self.line();
            let after_line = line.data().text().get(line.end_index()..).unwrap_or("");
            if self.line_is_terminated()
                && after_line.starts_with("\r\n")
                && self.character_position == 0
            {
                self.character_position += 1;
                return true;
            }
            return self.next_nonempty_line(true);
        }

        self.character_position += 1;
        if self.character_position >= self.cluster_num_chars {
            return self.next_cluster_internal(true);
        }

        let data = self.line().data();
        self.index = if self.ltr {
            data.next_char(self.index)
        } else {
            data.prev_char(self.index)
        };
        true
    }

    fn next_cluster_internal(&mut self, include_terminators: bool) -> bool {
        let Some(run) = self.current_run() else {
            return self.next_nonempty_line(include_terminators);
        };

        if self.next_cluster_glyph == run.glyphs.len() {
            return self.next_nonempty_run(include_terminators);
        }

        self.cluster_start = self.next_cluster_glyph;
        self.cluster_x += self.cluster_width;
        let cluster = run.glyphs.glyphs()[self.cluster_start].cluster;
        self.update_cluster(cluster);
        true
    }

    fn next_nonempty_line(&mut self, include_terminators: bool) -> bool {
        loop {
            if !self.next_line() {
                return false;
            }
            if !self.line().runs().is_empty() {
                return true;
            }
            if include_terminators && self.line_is_terminated() {
                return true;
            }
        }
    }

    fn next_nonempty_run(&mut self, include_terminators: bool) -> bool {
        loop {
            if !self.next_run() {
                return false;
            }
            if self.slot != Slot::LineEnd {
                return true;
            }
            if include_terminators && self.line_is_terminated() {
                return true;
            }
        }
    }

    fn offset_line(&self, rect: Rect) -> Rect {
        rect.offset(self.line_x, self.line_y)
    }

    /// Extents of the whole container.
    pub fn layout_extents(&self) -> (Rect, Rect) {
        self.check_valid();
        self.lines.extents()
    }

    /// Extents of the current line in container coordinates.
    pub fn line_extents(&self) -> (Rect, Rect) {
        self.check_valid();
        let (ink, logical) = self.line().extents();
        (self.offset_line(ink), self.offset_line(logical))
    }

    pub fn trimmed_line_extents(&self, trim: LeadingTrim) -> Rect {
        self.check_valid();
        self.offset_line(self.line().trimmed_extents(trim))
    }

    /// Extents of the current run with leading trimmed, in container
    /// coordinates. The line-end run is a zero-width box at the end of the
    /// last real run.
    pub fn run_extents(&self) -> (Rect, Rect) {
        self.check_valid();
        let line = self.line();
        let context = line.context();

        let (ink, logical) = match (self.current_run(), line.runs().last()) {
            (Some(run), _) => run.extents(context, LeadingTrim::BOTH),
            (None, Some(last)) => {
                let (mut ink, mut logical) = last.extents(context, LeadingTrim::BOTH);
                ink.width = 0;
                logical.width = 0;
                (ink, logical)
            }
            (None, None) => {
                let rect = line.empty_extents(LeadingTrim::BOTH);
                (rect, rect)
            }
        };

        (
            self.offset_line(ink).offset(self.run_x, 0),
            self.offset_line(logical).offset(self.run_x, 0),
        )
    }

    /// Extents of the current cluster in container coordinates.
    pub fn cluster_extents(&self) -> (Rect, Rect) {
        self.check_valid();
        let Some(run) = self.current_run() else {
            return self.run_extents();
        };

        let (ink, logical) = run.glyphs.extents_range(
            self.cluster_start,
            self.next_cluster_glyph,
            run.item.analysis.font.as_ref(),
        );
        debug_assert_eq!(logical.width, self.cluster_width);

        let dx = self.cluster_x + run.start_x_offset;
        let dy = -run.y_offset;
        (
            self.offset_line(ink).offset(dx, dy),
            self.offset_line(logical).offset(dx, dy),
        )
    }

    /// Logical extents of the current character: its share of the
    /// cluster's width.
    pub fn char_extents(&self) -> Rect {
        let (_, cluster) = self.cluster_extents();
        if self.slot == Slot::LineEnd {
            return cluster;
        }

        let (x0, x1) = if self.cluster_num_chars > 0 {
            let n = self.cluster_num_chars as i64;
            let pos = self.character_position as i64;
            let width = i64::from(cluster.width);
            ((pos * width / n) as i32, ((pos + 1) * width / n) as i32)
        } else {
            (0, 0)
        };

        Rect::new(cluster.x + x0, cluster.y, x1 - x0, cluster.height)
    }

    /// Y of the current line's baseline.
    pub fn line_baseline(&self) -> i32 {
        self.check_valid();
        self.line_y
    }

    /// Y of the current run's baseline, which differs from the line's for
    /// raised or lowered runs.
    pub fn run_baseline(&self) -> i32 {
        self.check_valid();
        match self.current_run() {
            Some(run) => self.line_y - run.y_offset,
            None => self.line_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::context::Context;
    use crate::font::fixed::FixedFont;
    use crate::font::FontId;
    use crate::layout::line::LineBuilder;
    use crate::layout::line_data::LineData;
    use crate::text::attrs::AttrList;
    use crate::text::direction::Direction;
    use crate::units::SCALE;

    const W: i32 = 8 * SCALE;

    fn single(text: &str, direction: Direction, level: u8) -> Lines {
        let font = Arc::new(FixedFont::new(FontId(1)));
        let ctx = Arc::new(Context::new(font.clone()));
        let data = Arc::new(LineData::new(text, direction, AttrList::new()));
        let line = LineBuilder::new(ctx, data.clone())
            .run(font.shape(&data, 0..data.len(), level))
            .starts_paragraph(true)
            .ends_paragraph(true)
            .build()
            .unwrap();
        let mut lines = Lines::new();
        lines.add_line(line, 0, 12 * SCALE);
        lines
    }

    #[test]
    fn test_walks_clusters_then_line_end() {
        let lines = single("ab", Direction::Ltr, 0);
        let mut iter = lines.iter().unwrap();
        assert!(matches!(iter.run(), RunSlot::Run(_)));
        assert_eq!(iter.index(), 0);
        assert_eq!(iter.cluster_extents().1.x, 0);

        assert!(iter.next_cluster());
        assert_eq!(iter.index(), 1);
        assert_eq!(iter.cluster_extents().1, Rect::new(W, 0, W, 16 * SCALE));

        // the last line's end is not a cluster
        assert!(!iter.next_cluster());
        assert!(iter.at_last_line());
    }

    #[test]
    fn test_next_run_reaches_line_end() {
        let lines = single("ab", Direction::Ltr, 0);
        let mut iter = lines.iter().unwrap();
        assert!(iter.next_run());
        assert!(matches!(iter.run(), RunSlot::LineEnd));
        assert_eq!(iter.index(), 2);
        let (_, logical) = iter.run_extents();
        assert_eq!((logical.x, logical.width), (2 * W, 0));
        assert!(!iter.next_run());
    }

    #[test]
    fn test_rtl_clusters_in_visual_order() {
        let lines = single("אב", Direction::Rtl, 1);
        let mut iter = lines.iter().unwrap();
        // leftmost cluster is the logically last character
        assert_eq!(iter.index(), 2);
        assert!(iter.next_cluster());
        assert_eq!(iter.index(), 0);
        assert_eq!(iter.cluster_extents().1.x, W);
    }

    #[test]
    fn test_char_extents_split_cluster() {
        // a ligature glyph covering "ffi"
        let font = Arc::new(FixedFont::new(FontId(1)));
        let ctx = Arc::new(Context::new(font.clone()));
        let data = Arc::new(LineData::from_text("ffi"));
        let mut run = font.shape(&data, 0..3, 0);
        run.glyphs = [crate::glyph::GlyphInfo::new(crate::glyph::GlyphId(1), 3 * W, 0, true)]
            .into_iter()
            .collect();
        let line = LineBuilder::new(ctx, data).run(run).build().unwrap();
        let mut lines = Lines::new();
        lines.add_line(line, 0, 0);

        let mut iter = lines.iter().unwrap();
        assert_eq!(iter.char_extents().width, W);
        assert!(iter.next_char());
        assert_eq!(iter.index(), 1);
        assert_eq!(iter.char_extents().x, W);
        assert!(iter.next_char());
        assert_eq!(iter.char_extents().x, 2 * W);
        assert!(!iter.next_char());
    }

    #[test]
    fn test_crlf_terminator_stops_twice() {
        let font = Arc::new(FixedFont::new(FontId(1)));
        let ctx = Arc::new(Context::new(font.clone()));
        let data = Arc::new(LineData::from_text("a\r\nb"));
        let first = LineBuilder::new(ctx.clone(), data.clone())
            .range(0..1)
            .run(font.shape(&data, 0..1, 0))
            .ends_paragraph(true)
            .build()
            .unwrap();
        let second = LineBuilder::new(ctx, data.clone())
            .range(3..4)
            .run(font.shape(&data, 3..4, 0))
            .starts_paragraph(true)
            .build()
            .unwrap();
        let mut lines = Lines::new();
        lines.add_line(first, 0, 0);
        lines.add_line(second, 0, 18 * SCALE);

        let mut iter = lines.iter().unwrap();
        assert!(iter.next_char());
        assert!(matches!(iter.run(), RunSlot::LineEnd));
        assert_eq!(iter.index(), 1);
        assert!(iter.next_char());
        assert_eq!(iter.line_no(), 0);
        assert!(iter.next_char());
        assert_eq!(iter.line_no(), 1);
        assert_eq!(iter.index(), 3);
        assert_eq!(iter.line_baseline(), 18 * SCALE);
    }

    #[test]
    fn test_empty_line_yields_line_end() {
        let font = Arc::new(FixedFont::new(FontId(1)));
        let ctx = Arc::new(Context::new(font));
        let data = Arc::new(LineData::from_text(""));
        let line = LineBuilder::new(ctx, data).build().unwrap();
        let mut lines = Lines::new();
        lines.add_line(line, 0, 0);

        let iter = lines.iter().unwrap();
        assert!(matches!(iter.run(), RunSlot::LineEnd));
        let (ink, logical) = iter.run_extents();
        assert_eq!(ink, logical);
        assert_eq!(logical.height, 16 * SCALE);
    }

    #[test]
    fn test_run_baseline_follows_y_offset() {
        let font = Arc::new(FixedFont::new(FontId(1)));
        let ctx = Arc::new(Context::new(font.clone()));
        let data = Arc::new(LineData::from_text("x"));
        let mut run = font.shape(&data, 0..1, 0);
        run.y_offset = 2 * SCALE;
        let line = LineBuilder::new(ctx, data).run(run).build().unwrap();
        let mut lines = Lines::new();
        lines.add_line(line, 0, 20 * SCALE);

        let iter = lines.iter().unwrap();
        assert_eq!(iter.line_baseline(), 20 * SCALE);
        assert_eq!(iter.run_baseline(), 18 * SCALE);
        assert!(iter.is_valid());
    }
}
