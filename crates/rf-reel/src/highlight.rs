//! Highlight light cycling during the Spinning phase

use std::time::Duration;

/// Cycles an active light index `0, 1, .., light_count - 1, 0, ..`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightCycler {
    light_count: u8,
    active: Option<u8>,
    steps: u32,
}

impl HighlightCycler {
    pub fn new(light_count: u8) -> Self {
        Self {
            light_count: light_count.max(1),
            active: None,
            steps: 0,
        }
    }

    /// Sub-interval between steps: one step per light per revolution
    pub fn step_interval(spin_duration: Duration, revolutions: u32, light_count: u8) -> Duration {
        let steps = Self::step_count(revolutions, light_count).max(1);
        let nanos = spin_duration.as_nanos() / steps as u128;
        Duration::from_nanos(nanos.min(u64::MAX as u128) as u64)
    }

    /// Steps taken during one Spinning phase
    pub fn step_count(revolutions: u32, light_count: u8) -> u32 {
        revolutions.saturating_mul(light_count as u32)
    }

    /// Move to the next light and return it
    pub fn advance(&mut self) -> u8 {
        let next = match self.active {
            Some(current) if current + 1 < self.light_count => current + 1,
            _ => 0,
        };
        self.active = Some(next);
        self.steps += 1;
        next
    }

    /// Turn all lights off
    pub fn clear(&mut self) {
        self.active = None;
        self.steps = 0;
    }

    pub fn active(&self) -> Option<u8> {
        self.active
    }

    /// Steps taken since the last clear
    pub fn steps(&self) -> u32 {
        self.steps
    }
}
