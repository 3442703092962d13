use tracing::debug;

use crate::layout::iter::LineIter;
use crate::layout::line::Line;
use crate::layout::run::LeadingTrim;
use crate::units::Rect;

/// A line and its origin in container coordinates.
#[derive(Debug, Clone)]
pub(crate) struct PositionedLine {
    pub(crate) line: Line,
    pub(crate) x: i32,
    pub(crate) y: i32,
}

/// An ordered collection of positioned lines.
///
/// Every mutation changes [`Lines::serial`], which iterators use to detect
/// that they are stale.
#[derive(Debug, Clone)]
pub struct Lines {
    pub(crate) lines: Vec<PositionedLine>,
    serial: u32,
}

impl Default for Lines {
    fn default() -> Self {
        Self::new()
    }
}

impl Lines {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            serial: 1,
        }
    }

    /// Append `line` with its baseline origin at (`x`, `y`).
    pub fn add_line(&mut self, line: Line, x: i32, y: i32) {
        debug!(
            line_no = self.lines.len(),
            start = line.start_index(),
            length = line.length(),
            x,
            y,
            "line added"
        );
        self.lines.push(PositionedLine { line, x, y });
        self.serial = self.serial.wrapping_add(1);
        if self.serial == 0 {
            self.serial = 1;
        }
    }

    /// Mutation counter; never 0.
    pub fn serial(&self) -> u32 {
        self.serial
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line `num` with its origin.
    pub fn line(&self, num: usize) -> Option<(&Line, i32, i32)> {
        self.lines.get(num).map(|l| (&l.line, l.x, l.y))
    }

    /// Lines in order with their origins.
    pub fn lines(&self) -> impl Iterator<Item = (&Line, i32, i32)> + '_ {
        self.lines.iter().map(|l| (&l.line, l.x, l.y))
    }

    /// An iterator positioned on the first line, or `None` when empty.
    pub fn iter(&self) -> Option<LineIter<'_>> {
        LineIter::new(self)
    }

    /// Ink and logical extents of all lines in container coordinates.
    ///
    /// Each line's logical box is trimmed at paragraph boundaries; ink is
    /// untrimmed.
    pub fn extents(&self) -> (Rect, Rect) {
        let mut ink = Rect::default();
        let mut logical = Rect::default();

        for (i, l) in self.lines.iter().enumerate() {
            let mut trim = LeadingTrim::NONE;
            if l.line.is_paragraph_start() {
                trim |= LeadingTrim::START;
            }
            if l.line.is_paragraph_end() {
                trim |= LeadingTrim::END;
            }

            let (line_ink, _) = l.line.extents();
            let line_ink = line_ink.offset(l.x, l.y);
            let line_logical = l.line.trimmed_extents(trim).offset(l.x, l.y);

            if i == 0 {
                ink = line_ink;
                logical = line_logical;
            } else {
                ink = ink.union(&line_ink);
                logical = logical.union(&line_logical);
            }
        }

        (ink, logical)
    }

    /// Width and height of the logical extents.
    pub fn size(&self) -> (i32, i32) {
        let (_, logical) = self.extents();
        (logical.width, logical.height)
    }

    /// Baseline of the first line, or 0 when empty.
    pub fn baseline(&self) -> i32 {
        self.lines.first().map_or(0, |l| l.y)
    }

    /// Number of glyphs standing in for characters missing from their font.
    pub fn unknown_glyphs_count(&self) -> usize {
        self.lines
            .iter()
            .flat_map(|l| l.line.runs())
            .flat_map(|r| r.glyphs.glyphs())
            .filter(|g| g.glyph.is_unknown())
            .count()
    }

    pub fn is_wrapped(&self) -> bool {
        self.lines.iter().any(|l| l.line.is_wrapped())
    }

    pub fn is_ellipsized(&self) -> bool {
        self.lines.iter().any(|l| l.line.is_ellipsized())
    }

    pub fn is_hyphenated(&self) -> bool {
        self.lines.iter().any(|l| l.line.is_hyphenated())
    }
}
