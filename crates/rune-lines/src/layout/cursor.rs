use tracing::trace;

use crate::layout::lines::Lines;

/// Visual direction of a cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementDirection {
    Left,
    Right,
}

/// Outcome of [`Lines::move_cursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMotion {
    /// Moved before the first position of the first line.
    OffStart,
    /// Moved past the last position of the last line.
    OffEnd,
    /// New cursor location: a grapheme start plus a trailing character count.
    Moved {
        line_no: usize,
        index: usize,
        trailing: usize,
    },
}

impl CursorMotion {
    /// The new index, with -1 for [`CursorMotion::OffStart`] and
    /// `i32::MAX` for [`CursorMotion::OffEnd`].
    pub fn index_or_sentinel(&self) -> i64 {
        match *self {
            CursorMotion::OffStart => -1,
            CursorMotion::OffEnd => i64::from(i32::MAX),
            CursorMotion::Moved { index, .. } => index as i64,
        }
    }
}

/// A cursor stop on a line, at its strong or weak x position.
#[derive(Debug, Clone, Copy)]
struct VisualCursor {
    x: i32,
    index: usize,
}

impl Lines {
    /// Cursor stops of line `line_no` sorted left to right.
    fn visual_cursors(&self, line_no: usize, strong: bool) -> Vec<VisualCursor> {
        let line = &self.lines[line_no].line;
        let x_offset = self.lines[line_no].x;
        let data = line.data();
        let log_attrs = data.log_attrs();

        let mut last = line.start_offset() + line.n_chars();
        if line.is_paragraph_end() {
            last += 1;
        }

        let mut cursors: Vec<VisualCursor> = (line.start_offset()..last)
            .filter(|&offset| log_attrs[offset].is_cursor_position)
            .map(|offset| {
                let index = data.char_index(offset);
                let pos = line.cursor_pos(index);
                let rect = if strong { pos.strong } else { pos.weak };
                VisualCursor {
                    x: rect.x + x_offset,
                    index,
                }
            })
            .collect();
        cursors.sort_by_key(|c| c.x);
        cursors
    }

    /// Move the cursor one visual position left or right.
    ///
    /// `index` and `trailing` give the current position as a grapheme start
    /// plus a count of characters past it. `strong` selects which of the
    /// strong or weak cursors is being moved. Moving past a line edge
    /// continues on the adjacent line; crossing a paragraph boundary costs
    /// an extra step.
    pub fn move_cursor(
        &self,
        strong: bool,
        hint: Option<usize>,
        index: usize,
        trailing: usize,
        direction: MovementDirection,
    ) -> Option<CursorMotion> {
        let hit = self.index_to_line(index, hint)?;
        let mut line_no = hit.line_no;
        let mut line = &self.lines[line_no].line;
        let data = line.data();
        let left = direction == MovementDirection::Left;

        let mut index = index;
        for _ in 0..trailing {
            index = data.next_char(index);
        }
        index = index.min(line.end_index());

        let mut cursors = self.visual_cursors(line_no, strong);
        let pos = line.cursor_pos(index);
        let x = if strong { pos.strong.x } else { pos.weak.x } + self.lines[line_no].x;

        let mut vis: isize = -1;
        for (j, cursor) in cursors.iter().enumerate() {
            if cursor.x == x {
                vis = j as isize;
                if left {
                    break;
                }
            }
        }

        let ltr = line.resolved_direction().is_ltr();
        if vis == -1 && index == line.end_index() {
            vis = if ltr { cursors.len() as isize } else { 0 };
        }

        let (off_start, off_end) = if ltr {
            (
                index == line.start_index() && left,
                index == line.end_index() && !left,
            )
        } else {
            (
                index == line.end_index() && left,
                index == line.start_index() && !left,
            )
        };

        if off_start || off_end {
            let paragraph_boundary = if off_start {
                if line_no == 0 {
                    trace!(index, "cursor moved off the start");
                    return Some(CursorMotion::OffStart);
                }
                line_no -= 1;
                line = &self.lines[line_no].line;
                line.end_index() != index
            } else {
                if line_no + 1 >= self.lines.len() {
                    trace!(index, "cursor moved off the end");
                    return Some(CursorMotion::OffEnd);
                }
                line_no += 1;
                line = &self.lines[line_no].line;
                line.start_index() != index
            };
            trace!(line_no, paragraph_boundary, "cursor crossed lines");

            cursors = self.visual_cursors(line_no, strong);
            let extra_step =
                paragraph_boundary && line.context().config().cursor.paragraph_boundary_step;
            if off_start && left {
                vis = cursors.len() as isize;
                if extra_step {
                    vis += 1;
                }
            } else if off_end && !left {
                vis = 0;
                if extra_step {
                    vis -= 1;
                }
            }
        }

        vis += if left { -1 } else { 1 };

        let len = cursors.len() as isize;
        let mut new_index = if (0..len).contains(&vis) {
            cursors[vis as usize].index
        } else if vis >= len - 1 {
            line.end_index()
        } else {
            line.start_index()
        };

        let mut new_trailing = 0;
        if new_index == line.end_index() && line.length() > 0 {
            let data = line.data();
            let log_attrs = data.log_attrs();
            let start_offset = line.start_offset();
            let mut offset = start_offset + line.n_chars();
            loop {
                offset -= 1;
                new_index = data.prev_char(new_index);
                new_trailing += 1;
                if offset <= start_offset || log_attrs[offset].is_cursor_position {
                    break;
                }
            }
        }

        Some(CursorMotion::Moved {
            line_no,
            index: new_index,
            trailing: new_trailing,
        })
    }
}
