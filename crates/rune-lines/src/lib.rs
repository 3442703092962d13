//! rune-lines: line, run and iterator core for laid-out text.
//!
//! The crate consumes pre-shaped glyph runs grouped into lines and answers
//! the positional questions an editor or renderer asks of them:
//! - index <-> x conversion inside a line, across bidirectional runs
//! - strong/weak cursor and caret placement
//! - justification by redistributing space into glyph widths
//! - multi-line lookup, visual cursor motion and selection ranges
//! - a visual-order iterator over lines, runs, clusters and characters
//!
//! All geometry is in integer layout units, see [`units::SCALE`].

pub mod context;
pub mod error;
pub mod font;
pub mod glyph;
pub mod layout;
pub mod text;
pub mod units;

pub use context::Context;
pub use error::{LayoutError, Result};
pub use font::{
    cache::MetricsCache,
    fixed::FixedFont,
    metrics::{CaretMetrics, FontMetrics},
    Font, FontId, GlyphExtents,
};
pub use glyph::{
    cluster::{Cluster, ClusterIter},
    item::{Analysis, Item},
    GlyphGeometry, GlyphId, GlyphInfo, GlyphString,
};
pub use layout::{
    cursor::{CursorMotion, MovementDirection},
    hit_test::LineHit,
    iter::{LineIter, RunSlot},
    line::{CursorPos, Line, LineBuilder, LineFlags, XToIndex},
    line_data::LineData,
    lines::Lines,
    run::{LeadingTrim, Run},
    selection::SelectionBound,
};
pub use rune_config::{Hinting, LinesConfig};
pub use text::{
    attrs::{AttrList, AttrValue, Attribute},
    direction::Direction,
    log_attrs::{compute_log_attrs, LogAttr},
};
pub use units::{Rect, SCALE};
