//! Reel phase and observable state

use serde::{Deserialize, Serialize};

use crate::event::Easing;
use crate::roster::RosterItem;

/// Spin phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReelPhase {
    /// No spin running (also the state right after a spin request,
    /// until the next scheduling turn)
    #[default]
    Idle,
    /// Linear spin toward the overshoot offset
    Spinning,
    /// Bouncing back onto the winner
    Bouncing,
    /// Winner fixed and reported
    Settled,
}

impl ReelPhase {
    /// Phase is part of an animation
    pub fn is_animating(&self) -> bool {
        matches!(self, Self::Spinning | Self::Bouncing)
    }
}

/// Snapshot of one reel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelState {
    pub phase: ReelPhase,
    /// Current scroll offset (px)
    pub offset_px: f64,
    /// Current transition duration (ms)
    pub transition_duration_ms: u64,
    /// Current transition easing
    pub easing: Easing,
    /// Winner of the last settled spin
    pub selected: Option<RosterItem>,
    /// Winner's strip index, set on settle
    pub winner_strip_index: Option<usize>,
    /// Highlighted light while spinning
    pub active_light: Option<u8>,
    /// Result-dependent visuals are shown
    pub result_visible: bool,
    /// Roster index of the last settled winner; seeds the next start offset
    pub last_winner_index: usize,
}

impl ReelState {
    pub fn new(easing: Easing) -> Self {
        Self {
            phase: ReelPhase::Idle,
            offset_px: 0.0,
            transition_duration_ms: 0,
            easing,
            selected: None,
            winner_strip_index: None,
            active_light: None,
            result_visible: false,
            last_winner_index: 0,
        }
    }

    /// Clear per-spin fields; `last_winner_index` and the strip position survive
    pub fn reset_for_spin(&mut self) {
        self.phase = ReelPhase::Idle;
        self.selected = None;
        self.winner_strip_index = None;
        self.active_light = None;
        self.result_visible = false;
    }
}

impl Default for ReelState {
    fn default() -> Self {
        Self::new(Easing::default())
    }
}
