//! Justification: stretch a line to a target width by widening glyphs.
//!
//! Space is given to expandable spaces in proportion to their width. Lines
//! without any fall back to letter spacing between grapheme clusters. The
//! added amount always sums to exactly the requested remainder.

use std::sync::OnceLock;

use rune_config::{Hinting, JustifyConfig};
use tracing::{trace, warn};

use crate::glyph::cluster::ClusterIter;
use crate::layout::line::{Line, LineFlags};
use crate::layout::line_data::LineData;
use crate::layout::run::Run;
use crate::units::{is_whole_pixel, units_round, SCALE};

impl Line {
    /// Widen the line to `width`. Lines already at least that wide are
    /// returned unchanged.
    ///
    /// Any narrower line is marked justified, even when no space could be
    /// added (a single visible cluster, or no spaces with the letter
    /// spacing fallback off).
    pub fn justify(mut self, width: i32) -> Line {
        let remaining = width - self.compute_width();
        if remaining <= 0 {
            return self;
        }

        let context = self.context.clone();
        let config = &context.config().justify;
        let added = justify_words(&mut self.runs, &self.data, config, remaining);
        trace!(remaining, added, "justified line");

        self.flags.insert(LineFlags::JUSTIFIED);
        self.extents = OnceLock::new();
        self
    }
}

fn is_hinted(hinting: Hinting, remaining: i32) -> bool {
    match hinting {
        Hinting::Auto => remaining % SCALE == 0,
        Hinting::Always => true,
        Hinting::Never => false,
    }
}

/// Distribute `remaining` over expandable spaces. Returns the amount added.
fn justify_words(runs: &mut [Run], data: &LineData, config: &JustifyConfig, remaining: i32) -> i32 {
    let log_attrs = data.log_attrs();

    // Glyphs of every expandable-space cluster, per run.
    let mut space_glyphs: Vec<Vec<usize>> = Vec::with_capacity(runs.len());
    let mut total_space_width: i64 = 0;
    for run in runs.iter() {
        let text = run.text(data);
        let ltr = !run.item.analysis.is_rtl();
        let mut glyphs = Vec::new();
        for cluster in ClusterIter::new(&run.glyphs, text, ltr) {
            if !log_attrs[run.item.char_offset + cluster.start_char].is_expandable_space {
                continue;
            }
            for i in cluster.glyph_range() {
                let width = run.glyphs.glyphs()[i].geometry.width;
                if width != 0 {
                    total_space_width += i64::from(width);
                    glyphs.push(i);
                }
            }
        }
        space_glyphs.push(glyphs);
    }

    if total_space_width == 0 {
        if config.letter_spacing_fallback {
            trace!("no expandable spaces, justifying clusters");
            return justify_clusters(runs, data, config, remaining);
        }
        return 0;
    }

    let hinted = is_hinted(config.hinting, remaining);
    let mut spaces_so_far: i64 = 0;
    let mut added = 0;
    for (run, glyphs) in runs.iter_mut().zip(&space_glyphs) {
        let infos = run.glyphs.glyphs_mut();
        for &i in glyphs {
            let geometry = &mut infos[i].geometry;
            spaces_so_far += i64::from(geometry.width);
            let target = (spaces_so_far * i64::from(remaining) / total_space_width) as i32;
            let mut adjustment = target - added;
            if hinted && spaces_so_far < total_space_width {
                adjustment = units_round(adjustment);
            }
            geometry.width += adjustment;
            added += adjustment;
        }
    }

    added
}

/// Split letter spacing between the two sides of a gap.
fn distribute_letter_spacing(gap: i32, hinted: bool) -> (i32, i32) {
    let mut space_left = gap / 2;
    if hinted && is_whole_pixel(gap) {
        space_left = units_round(space_left);
    }
    (space_left, gap - space_left)
}

/// A visible grapheme cluster: its run and its leftmost and rightmost glyph.
struct VisibleCluster {
    run: usize,
    left: usize,
    right: usize,
}

/// Distribute `remaining` over the gaps between visible clusters, never
/// before the first or after the last one. Returns the amount added.
fn justify_clusters(runs: &mut [Run], data: &LineData, config: &JustifyConfig, remaining: i32) -> i32 {
    let log_attrs = data.log_attrs();

    let mut clusters = Vec::new();
    for (run_no, run) in runs.iter().enumerate() {
        let text = run.text(data);
        let ltr = !run.item.analysis.is_rtl();
        // Visual order: logical for LTR runs, reversed for RTL runs.
        let iter = if ltr {
            ClusterIter::new(&run.glyphs, text, ltr)
        } else {
            ClusterIter::new_rev(&run.glyphs, text, ltr)
        };
        for cluster in iter {
            if !log_attrs[run.item.char_offset + cluster.start_char].is_cursor_position {
                continue;
            }
            let width: i32 = run.glyphs.glyphs()[cluster.glyph_range()]
                .iter()
                .map(|g| g.geometry.width)
                .sum();
            if width == 0 {
                continue;
            }
            let (left, right) = cluster.visual_edges();
            clusters.push(VisibleCluster {
                run: run_no,
                left,
                right,
            });
        }
    }

    if clusters.len() < 2 {
        if !clusters.is_empty() {
            warn!(remaining, "single cluster line cannot be justified");
        }
        return 0;
    }

    let hinted = is_hinted(config.hinting, remaining);
    let gaps = (clusters.len() - 1) as i64;
    let mut assigned = 0;
    for k in 1..=gaps {
        let mut target = (i64::from(remaining) * k / gaps) as i32;
        if hinted && k < gaps {
            target = units_round(target);
        }
        let gap = target - assigned;
        assigned = target;

        let (space_left, space_right) = distribute_letter_spacing(gap, hinted);
        let before = &clusters[k as usize - 1];
        runs[before.run].glyphs.glyphs_mut()[before.right].geometry.width += space_right;

        let after = &clusters[k as usize];
        let geometry = &mut runs[after.run].glyphs.glyphs_mut()[after.left].geometry;
        geometry.width += space_left;
        geometry.x_offset += space_left;
    }

    assigned
}
