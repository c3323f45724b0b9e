//! Strip geometry: start and final scroll offsets across the repeated strip
//!
//! The roster is tiled `strip_repetitions` times. A strip index is
//! `repetition * roster_len + item_index`. Spins always run from a high
//! repetition toward a lower one, so the strip never reverses between spins:
//!
//! ```text
//! start = start_repetition * len + last_winner            (previous resting row)
//! final = (start_repetition - revolutions) * len + winner
//! ```
//!
//! Offsets centre the row in the viewport:
//! `index * item_height + item_height / 2 - viewport_height / 2`.

use serde::{Deserialize, Serialize};

/// Pixel dimensions reported by the rendering surface.
/// `None` means not yet measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMetrics {
    pub item_height_px: Option<f64>,
    pub viewport_height_px: Option<f64>,
}

impl ItemMetrics {
    /// Metrics measured by the renderer
    pub fn measured(item_height_px: f64, viewport_height_px: f64) -> Self {
        Self {
            item_height_px: Some(item_height_px),
            viewport_height_px: Some(viewport_height_px),
        }
    }

    /// Both dimensions are known and usable
    pub fn is_measured(&self) -> bool {
        usable(self.item_height_px).is_some() && usable(self.viewport_height_px).is_some()
    }

    /// Resolve to concrete pixels, substituting defaults for anything unusable
    pub fn resolve(&self, default_item_px: f64, default_viewport_px: f64) -> (f64, f64) {
        (
            usable(self.item_height_px).unwrap_or(default_item_px),
            usable(self.viewport_height_px).unwrap_or(default_viewport_px),
        )
    }
}

fn usable(px: Option<f64>) -> Option<f64> {
    px.filter(|v| v.is_finite() && *v > 0.0)
}

/// Result of an offset computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StripOffsets {
    /// Offset the strip jumps to (without animation) before spinning
    pub start_offset_px: f64,
    /// Resting offset that centres the winner
    pub final_offset_px: f64,
    /// Strip index shown at the start offset
    pub start_strip_index: usize,
    /// Strip index of the winner at the final offset
    pub winner_strip_index: usize,
}

impl StripOffsets {
    pub const ZERO: Self = Self {
        start_offset_px: 0.0,
        final_offset_px: 0.0,
        start_strip_index: 0,
        winner_strip_index: 0,
    };

    /// Rows travelled during the spin (positive: toward lower indices)
    pub fn travel_rows(&self) -> i64 {
        self.start_strip_index as i64 - self.winner_strip_index as i64
    }
}

/// Geometry of one reel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripGeometry {
    pub item_height_px: f64,
    pub viewport_height_px: f64,
    /// Repetition the strip starts each spin from
    pub start_repetition: u32,
}

impl StripGeometry {
    pub fn new(item_height_px: f64, viewport_height_px: f64, start_repetition: u32) -> Self {
        Self {
            item_height_px,
            viewport_height_px,
            start_repetition,
        }
    }

    /// Strip index of an item within a repetition
    pub fn strip_index(repetition: u32, roster_len: usize, item_index: usize) -> usize {
        repetition as usize * roster_len + item_index
    }

    /// Pixel offset that centres `strip_index` in the viewport
    pub fn offset_for_index(&self, strip_index: usize) -> f64 {
        strip_index as f64 * self.item_height_px + self.item_height_px / 2.0
            - self.viewport_height_px / 2.0
    }

    /// Compute start and final offsets for a spin.
    ///
    /// `revolutions` must not exceed `start_repetition`; that is checked once
    /// by `ReelConfig::validate`. A `last_winner_index` beyond the roster
    /// (roster shrank since the last spin) wraps into range.
    pub fn compute(
        &self,
        roster_len: usize,
        winner_index: usize,
        last_winner_index: usize,
        revolutions: u32,
    ) -> StripOffsets {
        if roster_len == 0 {
            return StripOffsets::ZERO;
        }
        debug_assert!(revolutions <= self.start_repetition);
        debug_assert!(winner_index < roster_len);

        let target_repetition = self.start_repetition.saturating_sub(revolutions);
        let start_strip_index =
            Self::strip_index(self.start_repetition, roster_len, last_winner_index % roster_len);
        let winner_strip_index = Self::strip_index(target_repetition, roster_len, winner_index);

        StripOffsets {
            start_offset_px: self.offset_for_index(start_strip_index),
            final_offset_px: self.offset_for_index(winner_strip_index),
            start_strip_index,
            winner_strip_index,
        }
    }
}

/// One-shot form of [`StripGeometry::compute`]
pub fn compute_offsets(
    roster_len: usize,
    item_height_px: f64,
    viewport_height_px: f64,
    winner_index: usize,
    last_winner_index: usize,
    revolutions: u32,
    start_repetition: u32,
) -> StripOffsets {
    StripGeometry::new(item_height_px, viewport_height_px, start_repetition).compute(
        roster_len,
        winner_index,
        last_winner_index,
        revolutions,
    )
}
