use core::ops::Range;
use std::sync::{Arc, OnceLock};

use bitflags::bitflags;

use crate::context::Context;
use crate::error::{LayoutError, Result};
use crate::layout::line_data::LineData;
use crate::layout::run::{apply_leading, LeadingTrim, Run};
use crate::text::attrs::AttrValue;
use crate::text::direction::Direction;
use crate::text::log_attrs::LogAttr;
use crate::units::Rect;

bitflags! {
    /// Per-line state reported by the line breaker.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LineFlags: u8 {
        const WRAPPED          = 0b00_0001;
        const ELLIPSIZED       = 0b00_0010;
        const HYPHENATED       = 0b00_0100;
        const JUSTIFIED        = 0b00_1000;
        const STARTS_PARAGRAPH = 0b01_0000;
        const ENDS_PARAGRAPH   = 0b10_0000;
    }
}

/// Result of mapping an x position to a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XToIndex {
    /// Byte index of the grapheme under the position.
    pub index: usize,
    /// 0 for the leading edge, or the grapheme's character count when the
    /// position is closer to the trailing edge.
    pub trailing: usize,
    /// Whether the position fell inside the line.
    pub inside: bool,
}

/// Strong and weak cursor rectangles. Both are zero-width unless produced
/// by a caret query on a slanted font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorPos {
    pub strong: Rect,
    pub weak: Rect,
}

impl CursorPos {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            strong: self.strong.offset(dx, dy),
            weak: self.weak.offset(dx, dy),
        }
    }
}

/// One laid-out line: a byte window of a paragraph and the shaped runs
/// that cover it, in visual order.
///
/// Lines are immutable once built. [`Line::justify`] consumes the line and
/// returns the justified copy.
#[derive(Debug, Clone)]
pub struct Line {
    pub(crate) context: Arc<Context>,
    pub(crate) data: Arc<LineData>,
    start_index: usize,
    length: usize,
    start_offset: usize,
    n_chars: usize,
    pub(crate) runs: Vec<Run>,
    direction: Direction,
    pub(crate) flags: LineFlags,
    pub(crate) extents: OnceLock<(Rect, Rect)>,
}

/// Assembles a [`Line`] from shaped runs and validates it.
#[derive(Debug)]
pub struct LineBuilder {
    context: Arc<Context>,
    data: Arc<LineData>,
    range: Option<Range<usize>>,
    runs: Vec<Run>,
    direction: Option<Direction>,
    flags: LineFlags,
}

impl LineBuilder {
    /// Start a line over the whole paragraph, in the paragraph's direction.
    pub fn new(context: Arc<Context>, data: Arc<LineData>) -> Self {
        Self {
            context,
            data,
            range: None,
            runs: Vec::new(),
            direction: None,
            flags: LineFlags::empty(),
        }
    }

    /// Restrict the line to a byte range of the paragraph.
    pub fn range(mut self, range: Range<usize>) -> Self {
        self.range = Some(range);
        self
    }

    pub fn run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    pub fn runs(mut self, runs: impl IntoIterator<Item = Run>) -> Self {
        self.runs.extend(runs);
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn flags(mut self, flags: LineFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn wrapped(self, on: bool) -> Self {
        self.flag(LineFlags::WRAPPED, on)
    }

    pub fn ellipsized(self, on: bool) -> Self {
        self.flag(LineFlags::ELLIPSIZED, on)
    }

    pub fn hyphenated(self, on: bool) -> Self {
        self.flag(LineFlags::HYPHENATED, on)
    }

    pub fn starts_paragraph(self, on: bool) -> Self {
        self.flag(LineFlags::STARTS_PARAGRAPH, on)
    }

    pub fn ends_paragraph(self, on: bool) -> Self {
        self.flag(LineFlags::ENDS_PARAGRAPH, on)
    }

    fn flag(mut self, flag: LineFlags, on: bool) -> Self {
        self.flags.set(flag, on);
        self
    }

    pub fn build(self) -> Result<Line> {
        let data = self.data;
        let range = self.range.unwrap_or(0..data.len());
        if range.start > range.end || range.end > data.len() {
            return Err(LayoutError::RangeOutOfText {
                start: range.start,
                end: range.end,
                len: data.len(),
            });
        }
        for index in [range.start, range.end] {
            if !data.is_char_boundary(index) {
                return Err(LayoutError::NotCharBoundary(index));
            }
        }

        let start_offset = data.char_offset(range.start);
        let n_chars = data.char_offset(range.end) - start_offset;
        let line = Line {
            context: self.context,
            direction: self.direction.unwrap_or(data.direction()),
            data,
            start_index: range.start,
            length: range.len(),
            start_offset,
            n_chars,
            runs: self.runs,
            flags: self.flags,
            extents: OnceLock::new(),
        };
        line.check_invariants()?;
        Ok(line)
    }
}

impl Line {
    /// Verify that the runs exactly cover the line's byte and character
    /// ranges.
    pub fn check_invariants(&self) -> Result<()> {
        if self.runs.is_empty() {
            if self.length == 0 && self.n_chars == 0 {
                return Ok(());
            }
            return Err(LayoutError::RunCoverage {
                run_start: self.start_index,
                run_end: self.start_index,
                start: self.start_index,
                end: self.end_index(),
            });
        }

        let run_start = self.runs.iter().map(|r| r.item.offset).min().unwrap_or(0);
        let run_end = self.runs.iter().map(|r| r.item.end()).max().unwrap_or(0);
        let run_length: usize = self.runs.iter().map(|r| r.item.length).sum();
        if run_start != self.start_index
            || run_end != self.end_index()
            || run_length != self.length
        {
            return Err(LayoutError::RunCoverage {
                run_start,
                run_end,
                start: self.start_index,
                end: self.end_index(),
            });
        }

        let chars: usize = self.runs.iter().map(|r| r.item.num_chars).sum();
        if chars != self.n_chars {
            return Err(LayoutError::CharCount {
                expected: self.n_chars,
                found: chars,
            });
        }
        Ok(())
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    pub fn data(&self) -> &Arc<LineData> {
        &self.data
    }

    /// The line's slice of the paragraph text.
    pub fn text(&self) -> &str {
        &self.data.text()[self.start_index..self.end_index()]
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Length in bytes.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn end_index(&self) -> usize {
        self.start_index + self.length
    }

    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    pub fn n_chars(&self) -> usize {
        self.n_chars
    }

    /// Log attrs of the line's characters, including the boundary after
    /// the last one.
    pub fn log_attrs(&self) -> &[LogAttr] {
        &self.data.log_attrs()[self.start_offset..=self.start_offset + self.n_chars]
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    pub fn flags(&self) -> LineFlags {
        self.flags
    }

    pub fn is_wrapped(&self) -> bool {
        self.flags.contains(LineFlags::WRAPPED)
    }

    pub fn is_ellipsized(&self) -> bool {
        self.flags.contains(LineFlags::ELLIPSIZED)
    }

    pub fn is_hyphenated(&self) -> bool {
        self.flags.contains(LineFlags::HYPHENATED)
    }

    /// Whether [`Line::justify`] was applied with a wider target. Set even
    /// when the line had nowhere to put the extra space.
    pub fn is_justified(&self) -> bool {
        self.flags.contains(LineFlags::JUSTIFIED)
    }

    pub fn is_paragraph_start(&self) -> bool {
        self.flags.contains(LineFlags::STARTS_PARAGRAPH)
    }

    pub fn is_paragraph_end(&self) -> bool {
        self.flags.contains(LineFlags::ENDS_PARAGRAPH)
    }

    pub fn resolved_direction(&self) -> Direction {
        self.direction
    }

    /// Whether `index` lies within the line, end included.
    pub fn contains_index(&self, index: usize) -> bool {
        self.start_index <= index && index <= self.end_index()
    }

    /// The first run whose item contains byte `index`.
    pub fn index_to_run(&self, index: usize) -> Option<&Run> {
        self.runs.iter().find(|r| r.item.contains(index))
    }

    /// Sum of the runs' advance widths.
    pub fn compute_width(&self) -> i32 {
        self.runs.iter().map(Run::width).sum()
    }

    /// Ink and logical extents relative to the line's origin on its
    /// baseline. Computed once and cached.
    pub fn extents(&self) -> (Rect, Rect) {
        *self
            .extents
            .get_or_init(|| self.compute_extents(LeadingTrim::NONE))
    }

    /// Logical extents with the requested halves of the leading removed.
    pub fn trimmed_extents(&self, trim: LeadingTrim) -> Rect {
        if trim == LeadingTrim::NONE {
            return self.extents().1;
        }
        self.compute_extents(trim).1
    }

    fn compute_extents(&self, trim: LeadingTrim) -> (Rect, Rect) {
        if self.runs.is_empty() {
            return (Rect::default(), self.empty_extents(trim));
        }

        let mut ink = Rect::default();
        let mut logical = Rect::default();
        let mut x_pos = 0;

        for (i, run) in self.runs.iter().enumerate() {
            let (run_ink, run_logical) = run.extents(&self.context, trim);

            ink = ink.union_ink(&run_ink.offset(x_pos, 0));

            let run_logical = run_logical.offset(x_pos, 0);
            logical = if i == 0 {
                run_logical
            } else {
                logical.union(&run_logical)
            };

            x_pos += run_logical.width;
        }

        (ink, logical)
    }

    /// Logical box of a line without runs, from the metrics of the font in
    /// effect at the line start.
    pub fn empty_extents(&self, trim: LeadingTrim) -> Rect {
        let mut font = self.context.font().clone();
        let mut line_height = 0.0;
        let mut absolute_line_height = 0;

        for attr in self.data.attrs().attrs_at(self.start_index) {
            match &attr.value {
                AttrValue::Font(f) => font = f.clone(),
                AttrValue::LineHeight(factor) => line_height = *factor,
                AttrValue::AbsoluteLineHeight(height) => absolute_line_height = *height,
                AttrValue::LineSpacing(_) => {}
            }
        }

        let metrics = self.context.metrics(font.as_ref());
        let mut rect = Rect::new(0, -metrics.ascent, 0, metrics.ascent + metrics.descent);

        if trim != LeadingTrim::BOTH {
            let leading = if absolute_line_height != 0 || line_height != 0.0 {
                absolute_line_height.max((line_height * rect.height as f64).ceil() as i32)
                    - rect.height
            } else {
                metrics.leading()
            };
            apply_leading(&mut rect, leading, trim);
        }

        rect
    }

    /// Rectangle of the grapheme at `index`: x is its leading edge and the
    /// width reaches its trailing edge, so it is negative in right-to-left
    /// runs. The line end yields a zero-width rectangle.
    pub fn index_to_pos(&self, index: usize) -> Rect {
        debug_assert!(self.contains_index(index), "index {index} outside line");

        let (_, line_logical) = self.extents();
        let run = if index == self.end_index() {
            self.runs.last()
        } else {
            self.index_to_run(index)
        };
        let Some(run) = run else {
            return line_logical;
        };

        let (_, run_logical) = run.extents(&self.context, LeadingTrim::BOTH);
        let x = line_logical.x + self.index_to_x(index, false);
        let width = if index < self.end_index() {
            line_logical.x + self.index_to_x(index, true) - x
        } else {
            0
        };

        Rect::new(x, run_logical.y, width, run_logical.height)
    }

    /// X position of the leading (or trailing) edge of the grapheme at
    /// `index`, from the line's left edge. Indices inside a grapheme snap to
    /// its boundary. Indices past every run map to the line width.
    pub fn index_to_x(&self, index: usize, trailing: bool) -> i32 {
        let log_attrs = self.data.log_attrs();
        let end_index = self.end_index();
        let mut width = 0;

        for run in &self.runs {
            if !run.item.contains(index) {
                width += run.width();
                continue;
            }

            let mut index = index;
            let mut offset = self.data.char_offset(index);
            if trailing {
                while index < end_index
                    && offset + 1 < self.data.n_chars()
                    && !log_attrs[offset + 1].is_cursor_position
                {
                    offset += 1;
                    index = self.data.next_char(index);
                }
            } else {
                while index > self.start_index && !log_attrs[offset].is_cursor_position {
                    offset -= 1;
                    index = self.data.prev_char(index);
                }
            }

            let x = run.glyphs.index_to_x(
                run.text(&self.data),
                &run.item.analysis,
                Some(&log_attrs[run.item.char_offset..]),
                index.saturating_sub(run.item.offset),
                trailing,
            );
            return width + x;
        }

        width
    }

    /// Grapheme under `x`, measured from the line's left edge.
    ///
    /// Positions left of the line map to its leading edge and positions
    /// right of it to its trailing edge, in both cases with `inside` unset.
    pub fn x_to_index(&self, x: i32) -> XToIndex {
        if self.length == 0 {
            return XToIndex {
                index: self.start_index,
                trailing: 0,
                inside: false,
            };
        }

        let data = &self.data;
        let log_attrs = data.log_attrs();
        let first_index = self.start_index;
        let first_offset = self.start_offset;
        let end_offset = first_offset + self.n_chars;
        let ltr = self.direction.is_ltr();

        let mut last_index = self.end_index();
        let mut last_offset = end_offset;
        let mut last_trailing = 0;
        loop {
            last_index = data.prev_char(last_index);
            last_offset -= 1;
            last_trailing += 1;
            if last_offset <= first_offset || log_attrs[last_offset].is_cursor_position {
                break;
            }
        }

        // Landing past the end of a wrapped line would put the cursor on
        // the next line.
        let suppress_last_trailing =
            self.is_wrapped() && self.context.config().cursor.suppress_wrapped_trailing;

        if x < 0 {
            return XToIndex {
                index: if ltr { first_index } else { last_index },
                trailing: if ltr || suppress_last_trailing {
                    0
                } else {
                    last_trailing
                },
                inside: false,
            };
        }

        let mut start_pos = 0;
        for run in &self.runs {
            let width = run.width();
            if x >= start_pos && x < start_pos + width {
                let (pos, char_trailing) =
                    run.glyphs
                        .x_to_index(run.text(data), &run.item.analysis, x - start_pos);
                let char_index = run.item.offset + pos;
                let offset = data.char_offset(char_index);

                let mut grapheme_start_index = char_index;
                let mut grapheme_start_offset = offset;
                while grapheme_start_offset > first_offset
                    && !log_attrs[grapheme_start_offset].is_cursor_position
                {
                    grapheme_start_index = data.prev_char(grapheme_start_index);
                    grapheme_start_offset -= 1;
                }

                let mut grapheme_end_offset = offset;
                loop {
                    grapheme_end_offset += 1;
                    if grapheme_end_offset >= end_offset
                        || log_attrs[grapheme_end_offset].is_cursor_position
                    {
                        break;
                    }
                }

                let trailing = if (grapheme_end_offset == end_offset && suppress_last_trailing)
                    || offset + usize::from(char_trailing)
                        <= (grapheme_start_offset + grapheme_end_offset) / 2
                {
                    0
                } else {
                    grapheme_end_offset - grapheme_start_offset
                };

                return XToIndex {
                    index: grapheme_start_index,
                    trailing,
                    inside: true,
                };
            }
            start_pos += width;
        }

        XToIndex {
            index: if ltr { last_index } else { first_index },
            trailing: if ltr && !suppress_last_trailing {
                last_trailing
            } else {
                0
            },
            inside: false,
        }
    }

    /// Strong and weak cursor positions for an insertion point at `index`.
    ///
    /// The strong cursor is where text in the line's direction would be
    /// inserted; the weak cursor is where text of the opposite direction
    /// would go. Both coincide away from direction changes.
    pub fn cursor_pos(&self, index: usize) -> CursorPos {
        debug_assert!(self.contains_index(index), "index {index} outside line");

        let end = self.end_index();
        let line_ltr = self.direction.is_ltr();
        let line_level = self.direction.level();
        let (_, line_rect) = self.extents();

        let run = if index >= end {
            self.runs.last()
        } else {
            self.index_to_run(index)
        };
        let Some(run) = run else {
            let rect = Rect::new(line_rect.x + line_rect.width, line_rect.y, 0, line_rect.height);
            return CursorPos {
                strong: rect,
                weak: rect,
            };
        };
        let (_, run_rect) = run.extents(&self.context, LeadingTrim::BOTH);

        // Position of the boundary as seen from the preceding character.
        let (dir1, level1, x1) = if index == self.start_index {
            let x = if line_ltr { 0 } else { line_rect.width };
            (self.direction, line_level, x)
        } else {
            let prev = self.data.prev_char(index);
            match self.index_to_run(prev).filter(|_| prev < end) {
                Some(prev_run) => (
                    prev_run.direction(),
                    prev_run.level(),
                    self.index_to_x(prev, true),
                ),
                None => (self.direction, line_level, line_rect.width),
            }
        };

        // Position of the boundary as seen from the following character.
        let (dir2, level2, x2) = if index >= end {
            let x = if line_ltr { line_rect.width } else { 0 };
            (self.direction, line_level, x)
        } else {
            (run.direction(), run.level(), self.index_to_x(index, false))
        };

        let (strong_x, weak_x) = if dir1 == self.direction && (dir2 != dir1 || level1 < level2) {
            (x1, x2)
        } else {
            (x2, x1)
        };

        CursorPos {
            strong: Rect::new(line_rect.x + strong_x, run_rect.y, 0, run_rect.height),
            weak: Rect::new(line_rect.x + weak_x, run_rect.y, 0, run_rect.height),
        }
    }

    /// Cursor positions adjusted by the font's caret offset and slant.
    pub fn caret_pos(&self, index: usize) -> CursorPos {
        let mut pos = self.cursor_pos(index);

        let run = if index >= self.end_index() {
            self.runs.last()
        } else {
            self.index_to_run(index)
        };
        let Some(caret) = run.and_then(|r| r.item.analysis.font.caret_metrics()) else {
            return pos;
        };

        pos.strong.x += caret.offset;
        pos.weak.x += caret.offset;

        let Some(slope_inv) = caret.slope_inv() else {
            return pos;
        };
        for rect in [&mut pos.strong, &mut pos.weak] {
            rect.x = (rect.x as f64 + caret.descender as f64 * slope_inv) as i32;
            rect.width = (rect.height as f64 * slope_inv) as i32;
            if slope_inv < 0.0 {
                rect.x -= rect.width;
            }
        }
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::fixed::FixedFont;
    use crate::font::{CaretMetrics, FontId};
    use crate::text::attrs::{AttrList, Attribute};
    use crate::units::SCALE;

    const W: i32 = 8 * SCALE;

    fn font() -> Arc<FixedFont> {
        Arc::new(FixedFont::new(FontId(1)))
    }

    fn ltr_line(text: &str) -> Line {
        let font = font();
        let ctx = Arc::new(Context::new(font.clone()));
        let data = Arc::new(LineData::new(text, Direction::Ltr, AttrList::new()));
        let run = font.shape(&data, 0..data.len(), 0);
        LineBuilder::new(ctx, data)
            .run(run)
            .starts_paragraph(true)
            .ends_paragraph(true)
            .build()
            .unwrap()
    }

    /// "abאב" in an LTR paragraph: an LTR run then an RTL run.
    fn mixed_line() -> Line {
        let font = font();
        let ctx = Arc::new(Context::new(font.clone()));
        let data = Arc::new(LineData::new("abאב", Direction::Ltr, AttrList::new()));
        let first = font.shape(&data, 0..2, 0);
        let second = font.shape(&data, 2..6, 1);
        LineBuilder::new(ctx, data)
            .runs([first, second])
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_validates_coverage() {
        let font = font();
        let ctx = Arc::new(Context::new(font.clone()));
        let data = Arc::new(LineData::from_text("hello"));
        let run = font.shape(&data, 0..3, 0);
        let err = LineBuilder::new(ctx.clone(), data.clone())
            .run(run)
            .build()
            .unwrap_err();
        assert!(matches!(err, LayoutError::RunCoverage { .. }));

        let err = LineBuilder::new(ctx, data).range(2..9).build().unwrap_err();
        assert_eq!(
            err,
            LayoutError::RangeOutOfText {
                start: 2,
                end: 9,
                len: 5
            }
        );
    }

    #[test]
    fn test_builder_rejects_text_without_runs() {
        let ctx = Arc::new(Context::new(font()));
        let data = Arc::new(LineData::from_text("hello"));
        let err = LineBuilder::new(ctx.clone(), data.clone())
            .range(0..5)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::RunCoverage {
                run_start: 0,
                run_end: 0,
                start: 0,
                end: 5
            }
        );

        // an empty range needs no runs
        let line = LineBuilder::new(ctx, data).range(5..5).build().unwrap();
        assert_eq!(line.run_count(), 0);
        assert_eq!(line.compute_width(), 0);
    }

    #[test]
    fn test_builder_rejects_split_character() {
        let ctx = Arc::new(Context::new(font()));
        let data = Arc::new(LineData::from_text("é"));
        let err = LineBuilder::new(ctx, data).range(0..1).build().unwrap_err();
        assert_eq!(err, LayoutError::NotCharBoundary(1));
    }

    #[test]
    fn test_getters() {
        let line = ltr_line("hello");
        assert_eq!(line.text(), "hello");
        assert_eq!(line.n_chars(), 5);
        assert_eq!(line.log_attrs().len(), 6);
        assert_eq!(line.run_count(), 1);
        assert!(line.is_paragraph_start() && line.is_paragraph_end());
        assert!(!line.is_wrapped() && !line.is_justified());
        assert_eq!(line.compute_width(), 5 * W);
    }

    #[test]
    fn test_extents_include_leading() {
        let line = ltr_line("hi");
        let (ink, logical) = line.extents();
        // 18px height over 16px ascent + descent
        assert_eq!(logical, Rect::new(0, -13 * SCALE, 2 * W, 18 * SCALE));
        assert_eq!(ink.width, 2 * W);
        assert_eq!(
            line.trimmed_extents(LeadingTrim::BOTH),
            Rect::new(0, -12 * SCALE, 2 * W, 16 * SCALE)
        );
        assert_eq!(line.trimmed_extents(LeadingTrim::NONE), logical);
    }

    #[test]
    fn test_empty_line_uses_attr_font() {
        let base = font();
        let tall: Arc<dyn crate::font::Font> = Arc::new(
            FixedFont::new(FontId(2)).with_metrics(20 * SCALE, 5 * SCALE, 25 * SCALE),
        );
        let mut attrs = AttrList::new();
        attrs.insert(Attribute::new(0..1, AttrValue::Font(tall)));
        let ctx = Arc::new(Context::new(base));
        let data = Arc::new(LineData::new("\n", Direction::Ltr, attrs));
        let line = LineBuilder::new(ctx, data).range(0..0).build().unwrap();

        let (ink, logical) = line.extents();
        assert_eq!(ink, Rect::default());
        assert_eq!(logical, Rect::new(0, -20 * SCALE, 0, 25 * SCALE));
    }

    #[test]
    fn test_index_to_x_ltr() {
        let line = ltr_line("hello");
        assert_eq!(line.index_to_x(0, false), 0);
        assert_eq!(line.index_to_x(2, false), 2 * W);
        assert_eq!(line.index_to_x(2, true), 3 * W);
        assert_eq!(line.index_to_x(5, false), 5 * W);
    }

    #[test]
    fn test_index_to_x_snaps_inside_grapheme() {
        let line = ltr_line("ae\u{301}b");
        // the mark at byte 2 belongs to the grapheme starting at byte 1
        assert_eq!(line.index_to_x(2, false), W);
        assert_eq!(line.index_to_x(1, true), 2 * W);
    }

    #[test]
    fn test_index_to_x_mixed_runs() {
        let line = mixed_line();
        assert_eq!(line.index_to_x(1, false), W);
        // first RTL char sits at the right end
        assert_eq!(line.index_to_x(2, false), 4 * W);
        assert_eq!(line.index_to_x(4, false), 3 * W);
        assert_eq!(line.index_to_x(4, true), 2 * W);
    }

    #[test]
    fn test_index_to_pos() {
        let line = ltr_line("hello");
        let pos = line.index_to_pos(1);
        assert_eq!(pos, Rect::new(W, -12 * SCALE, W, 16 * SCALE));
        assert_eq!(line.index_to_pos(5).width, 0);

        let mixed = mixed_line();
        assert_eq!(mixed.index_to_pos(2).width, -W);
    }

    #[test]
    fn test_x_to_index() {
        let line = ltr_line("hello");
        assert_eq!(
            line.x_to_index(2 * W + 1),
            XToIndex {
                index: 2,
                trailing: 0,
                inside: true
            }
        );
        assert_eq!(line.x_to_index(2 * W + W / 2 + 1).trailing, 1);
        assert_eq!(
            line.x_to_index(-5),
            XToIndex {
                index: 0,
                trailing: 0,
                inside: false
            }
        );
        assert_eq!(
            line.x_to_index(100 * W),
            XToIndex {
                index: 4,
                trailing: 1,
                inside: false
            }
        );
    }

    #[test]
    fn test_x_to_index_grapheme_trailing() {
        let line = ltr_line("e\u{301}x");
        let hit = line.x_to_index(W - 10);
        assert_eq!((hit.index, hit.trailing), (0, 2));
    }

    #[test]
    fn test_x_to_index_wrapped_suppresses_trailing() {
        let font = font();
        let ctx = Arc::new(Context::new(font.clone()));
        let data = Arc::new(LineData::from_text("ab cd"));
        let run = font.shape(&data, 0..3, 0);
        let line = LineBuilder::new(ctx, data)
            .range(0..3)
            .run(run)
            .wrapped(true)
            .build()
            .unwrap();
        let hit = line.x_to_index(100 * W);
        assert_eq!((hit.index, hit.trailing, hit.inside), (2, 0, false));
        assert_eq!(line.x_to_index(3 * W - 1).trailing, 0);
    }

    #[test]
    fn test_cursor_pos_ltr() {
        let line = ltr_line("hello");
        let pos = line.cursor_pos(2);
        assert_eq!(pos.strong.x, 2 * W);
        assert_eq!(pos.weak.x, 2 * W);
        assert_eq!(pos.strong.width, 0);
        assert_eq!(line.cursor_pos(5).strong.x, 5 * W);
    }

    #[test]
    fn test_cursor_pos_direction_boundary() {
        let line = mixed_line();
        // between "b" and the RTL run: strong stays after "b", weak jumps to
        // the right edge of the RTL run
        let pos = line.cursor_pos(2);
        assert_eq!(pos.strong.x, 2 * W);
        assert_eq!(pos.weak.x, 4 * W);
        let end = line.cursor_pos(6);
        assert_eq!(end.strong.x, 4 * W);
        assert_eq!(end.weak.x, 2 * W);
    }

    #[test]
    fn test_caret_pos_slant() {
        let caret = CaretMetrics {
            rise: 4,
            run: 1,
            offset: 100,
            descender: -4 * SCALE,
            x_scale: 1,
            y_scale: 1,
        };
        let font = Arc::new(FixedFont::new(FontId(3)).with_caret(caret));
        let ctx = Arc::new(Context::new(font.clone()));
        let data = Arc::new(LineData::from_text("ab"));
        let run = font.shape(&data, 0..2, 0);
        let line = LineBuilder::new(ctx, data).run(run).build().unwrap();

        let plain = line.cursor_pos(1);
        let caret_pos = line.caret_pos(1);
        assert_eq!(caret_pos.strong.x, plain.strong.x + 100 - SCALE);
        assert_eq!(caret_pos.strong.width, 4 * SCALE);
    }
}
