use crate::layout::lines::Lines;

/// One end of a selection: a byte index and, optionally, the line it is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionBound {
    pub index: usize,
    pub line_hint: Option<usize>,
}

impl SelectionBound {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            line_hint: None,
        }
    }

    /// Pin the bound to line `line_no`.
    pub fn on_line(mut self, line_no: usize) -> Self {
        self.line_hint = Some(line_no);
        self
    }
}

impl Lines {
    /// Horizontal ranges covering the selection `start..end` on line
    /// `line_no`, in container coordinates and left-to-right order.
    ///
    /// When the selection continues onto earlier or later lines the ranges
    /// extend to the container's edge on that side. Adjacent ranges are not
    /// merged. A selection that does not reach the line yields no ranges.
    pub fn x_ranges(&self, line_no: usize, start: SelectionBound, end: SelectionBound) -> Vec<(i32, i32)> {
        let Some(placed) = self.lines.get(line_no) else {
            return Vec::new();
        };
        let (Some(start_hit), Some(end_hit)) = (
            self.index_to_line(start.index, start.line_hint),
            self.index_to_line(end.index, end.line_hint),
        ) else {
            return Vec::new();
        };
        if start_hit.line_no > line_no || end_hit.line_no < line_no {
            return Vec::new();
        }

        let line = &placed.line;
        let x_offset = placed.x;
        let data = line.data();
        let starts_before = start_hit.line_no < line_no;
        let ends_after = end_hit.line_no > line_no;
        let start_index = if starts_before { line.start_index() } else { start.index };
        let end_index = if ends_after { line.end_index() } else { end.index };

        let ltr = line.resolved_direction().is_ltr();
        let extends_left = (ltr && starts_before) || (!ltr && ends_after);
        let extends_right = (ltr && ends_after) || (!ltr && starts_before);

        let mut ranges = Vec::with_capacity(line.run_count() + 2);
        if x_offset > 0 && extends_left {
            ranges.push((0, x_offset));
        }

        let mut accumulated = 0;
        for run in line.runs() {
            let item = &run.item;
            if start_index < item.end() && end_index > item.offset {
                let run_start = start_index.max(item.offset);
                let run_end = end_index.min(item.end());
                if run_start < run_end {
                    // The trailing edge of the last selected character.
                    let last_char = data.prev_char(run_end);
                    let text = run.text(data);
                    let attrs = &data.log_attrs()[item.char_offset..];
                    let start_x = run.glyphs.index_to_x(
                        text,
                        &item.analysis,
                        Some(attrs),
                        run_start - item.offset,
                        false,
                    );
                    let end_x = run.glyphs.index_to_x(
                        text,
                        &item.analysis,
                        Some(attrs),
                        last_char - item.offset,
                        true,
                    );
                    let base = x_offset + accumulated;
                    ranges.push((base + start_x.min(end_x), base + start_x.max(end_x)));
                }
            }
            accumulated += run.width();
        }

        let (_, logical) = line.extents();
        let (width, _) = self.size();
        if x_offset + logical.width < width && extends_right {
            ranges.push((x_offset + logical.width, width));
        }

        ranges
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
    use crate::units::SCALE;

    const W: i32 = 8 * SCALE;

    /// "abcd ef" broken after the space; the second line is indented.
    fn lines() -> Lines {
        let font = Arc::new(FixedFont::new(FontId(1)));
        let ctx = Arc::new(Context::new(font.clone()));
        let data = Arc::new(LineData::from_text("abcd ef"));
        let mut lines = Lines::new();
        for (range, x, y) in [(0..5, 0, 12 * SCALE), (5..7, W, 30 * SCALE)] {
            let line = LineBuilder::new(ctx.clone(), data.clone())
                .range(range.clone())
                .run(font.shape(&data, range, 0))
                .build()
                .unwrap();
            lines.add_line(line, x, y);
        }
        lines
    }

    #[test]
    fn test_selection_within_line() {
        let lines = lines();
        let ranges = lines.x_ranges(0, SelectionBound::new(1), SelectionBound::new(3));
        assert_eq!(ranges, vec![(W, 3 * W)]);
    }

    #[test]
    fn test_selection_spanning_lines() {
        let lines = lines();
        let start = SelectionBound::new(2);
        let end = SelectionBound::new(6).on_line(1);

        // the first line is the widest, so there is no edge range after it
        let first = lines.x_ranges(0, start, end);
        assert_eq!(first, vec![(2 * W, 5 * W)]);

        // started on an earlier line: extend from the left edge
        let second = lines.x_ranges(1, start, end);
        assert_eq!(second, vec![(0, W), (W, 2 * W)]);
    }

    #[test]
    fn test_selection_not_on_line() {
        let lines = lines();
        let ranges = lines.x_ranges(1, SelectionBound::new(0), SelectionBound::new(2));
        assert!(ranges.is_empty());
        assert!(lines.x_ranges(9, SelectionBound::new(0), SelectionBound::new(2)).is_empty());
    }
}
