//! Font collaborator seam.
//!
//! The core never rasterizes or shapes; it only asks a font for per-glyph
//! extents, vertical metrics and caret information.

pub mod cache;
pub mod fixed;
pub mod metrics;

use core::fmt;

use crate::glyph::GlyphId;
use crate::text::direction::Direction;
use crate::units::Rect;

pub use metrics::{CaretMetrics, FontMetrics};

/// Identity of a font, used as the metrics cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontId(pub u32);

/// Ink and logical extents of a single glyph, relative to its origin on the
/// baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphExtents {
    pub ink: Rect,
    pub logical: Rect,
}

/// A font as seen by the line core.
pub trait Font: fmt::Debug + Send + Sync {
    fn id(&self) -> FontId;

    fn glyph_extents(&self, glyph: GlyphId) -> GlyphExtents;

    fn metrics(&self) -> FontMetrics;

    /// Caret slope and offset, if the font declares them.
    fn caret_metrics(&self) -> Option<CaretMetrics> {
        None
    }

    /// Whether the glyph is classified as a combining mark.
    fn is_mark(&self, _glyph: GlyphId) -> bool {
        false
    }

    /// Position of ligature caret `caret_index` inside `glyph`, measured from
    /// the glyph origin.
    fn ligature_caret(
        &self,
        _glyph: GlyphId,
        _direction: Direction,
        _caret_index: usize,
    ) -> Option<i32> {
        None
    }
}
