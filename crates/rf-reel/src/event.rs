//! Outbound updates for the rendering surface and observers

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::StripOffsets;
use crate::roster::RosterItem;
use crate::state::ReelPhase;

/// Transition timing curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    EaseOut,
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl Easing {
    /// Overshooting curve used to settle the strip
    pub const BOUNCE: Self = Self::CubicBezier {
        x1: 0.34,
        y1: 1.56,
        x2: 0.64,
        y2: 1.0,
    };
}

impl Default for Easing {
    fn default() -> Self {
        Self::EaseOut
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::EaseOut => f.write_str("ease-out"),
            Self::CubicBezier { x1, y1, x2, y2 } => {
                write!(f, "cubic-bezier({}, {}, {}, {})", x1, y1, x2, y2)
            }
        }
    }
}

/// Strip transform to apply
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StripTransform {
    /// Scroll offset; the strip is translated up by this many pixels
    pub offset_px: f64,
    /// Transition duration (0 = jump)
    pub duration_ms: u64,
    pub easing: Easing,
}

impl StripTransform {
    /// Instant jump with no animation
    pub fn jump(offset_px: f64, easing: Easing) -> Self {
        Self {
            offset_px,
            duration_ms: 0,
            easing,
        }
    }

    /// CSS-style transform value
    pub fn translate_y(&self) -> String {
        format!("translateY({}px)", -self.offset_px)
    }
}

/// Per-row visual hint once a spin has settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowHint {
    Plain,
    Winner,
    /// Row directly above the winner
    NeighborAbove,
    /// Row directly below the winner
    NeighborBelow,
}

/// Result of a completed spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
    /// Sequence number returned by `spin()`
    pub spin_id: u64,
    pub winner: RosterItem,
    /// Winner's index in the roster
    pub winner_index: usize,
    /// Offsets the spin ran between
    pub offsets: StripOffsets,
}

impl SpinOutcome {
    /// Winner's position in the repeated strip
    pub fn winner_strip_index(&self) -> usize {
        self.offsets.winner_strip_index
    }
}

/// Everything the controller publishes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReelEvent {
    Transform(StripTransform),
    ActiveLight(Option<u8>),
    Phase(ReelPhase),
    SpinComplete(SpinOutcome),
    /// An in-flight spin was preempted by a new one
    SpinCancelled { spin_id: u64 },
}
