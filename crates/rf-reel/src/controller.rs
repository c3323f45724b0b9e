//! Spin phase controller
//!
//! Drives one reel through `Idle → Spinning → Bouncing → Settled`:
//!
//! ```text
//! spin()            jump to start offset (0ms)              ── reset
//!   └─ next turn    Spinning: final - overshoot, linear    ── t0
//!        ├─ every   highlight step, revolutions × lights
//!        ├─ t0 + spin            Bouncing: final, bounce curve
//!        └─ t0 + spin + bounce   Settled: publish winner
//! ```
//!
//! A new `spin()` cancels every timer of the spin in flight before
//! scheduling its own, so only the newest spin can ever settle.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tokio::sync::broadcast;
use tokio::time::Instant;

use crate::config::{ReelConfig, ReelProfile};
use crate::error::ReelResult;
use crate::event::{ReelEvent, RowHint, SpinOutcome, StripTransform};
use crate::geometry::{ItemMetrics, StripGeometry, StripOffsets};
use crate::highlight::HighlightCycler;
use crate::history::WinnerHistory;
use crate::roster::{Roster, RosterItem};
use crate::selector;
use crate::state::{ReelPhase, ReelState};
use crate::timer::{self, TimerHost, TimerKind, Timers, Wake};

/// Spinning reel controller
///
/// Cheap handle over shared reel state; all phase progression happens on
/// tokio timers, so `spin()` must be called from within a tokio runtime.
pub struct SpinController {
    shared: Arc<Mutex<ReelCore>>,
}

/// Everything one reel owns
struct ReelCore {
    config: ReelConfig,
    metrics: ItemMetrics,
    state: ReelState,
    active: Option<ActiveSpin>,
    cycler: HighlightCycler,
    history: WinnerHistory,
    timers: Timers,
    rng: Box<dyn RngCore + Send>,
    events: broadcast::Sender<ReelEvent>,
    roster_len: usize,
    spin_seq: u64,
}

/// Spin between request and settle
struct ActiveSpin {
    spin_id: u64,
    winner: RosterItem,
    winner_index: usize,
    offsets: StripOffsets,
    spin_duration: Duration,
    bounce_duration: Duration,
    revolutions: u32,
}

impl TimerHost for ReelCore {
    fn timers(&mut self) -> &mut Timers {
        &mut self.timers
    }
}

impl SpinController {
    /// Create a controller with an OS-seeded RNG
    pub fn new(config: ReelConfig) -> ReelResult<Self> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create a controller drawing winners from `rng`
    pub fn with_rng<R: RngCore + Send + 'static>(config: ReelConfig, rng: R) -> ReelResult<Self> {
        config.validate()?;

        let (events, _) = broadcast::channel(config.event_capacity);
        let core = ReelCore {
            metrics: ItemMetrics::default(),
            state: ReelState::new(config.idle_easing),
            active: None,
            cycler: HighlightCycler::new(config.light_count),
            history: WinnerHistory::new(config.history_capacity),
            timers: Timers::new(),
            rng: Box::new(rng),
            events,
            roster_len: 0,
            spin_seq: 0,
            config,
        };

        Ok(Self {
            shared: Arc::new(Mutex::new(core)),
        })
    }

    /// Reseed the RNG for reproducible winners
    pub fn seed(&self, seed: u64) {
        self.shared.lock().rng = Box::new(StdRng::seed_from_u64(seed));
    }

    /// Subscribe to transform, light, phase and completion updates
    pub fn subscribe(&self) -> broadcast::Receiver<ReelEvent> {
        self.shared.lock().events.subscribe()
    }

    /// Row and viewport heights measured by the renderer
    pub fn set_metrics(&self, metrics: ItemMetrics) {
        self.shared.lock().metrics = metrics;
    }

    /// Spin duration for subsequent spins; a spin in flight keeps its own.
    ///
    /// Highlight steps are at least 1ms apart, so a spin shorter than
    /// `revolutions × light_count` ms ends (and turns the lights off) before
    /// every step has run.
    pub fn set_spin_duration(&self, duration_ms: u64) {
        let mut core = self.shared.lock();
        core.config.spin_duration_ms = duration_ms.max(1);
        core.config.profile = ReelProfile::Custom;
        debug!("[Reel] Spin duration set to {}ms", core.config.spin_duration_ms);
    }

    /// Start a spin over `roster`.
    ///
    /// Returns the spin id, or `None` for an empty roster (no state change).
    /// A spin already in flight is cancelled and replaced.
    pub fn spin(&self, roster: &Roster) -> Option<u64> {
        let mut guard = self.shared.lock();
        let core = &mut *guard;

        if roster.is_empty() {
            warn!("[Reel] Spin requested with an empty roster, ignoring");
            return None;
        }

        core.preempt();

        let winner_index = selector::select_index(roster.items(), &mut *core.rng)?;
        let winner = roster.items()[winner_index].clone();
        let offsets = core.geometry().compute(
            roster.len(),
            winner_index,
            core.state.last_winner_index,
            core.config.revolutions,
        );

        core.spin_seq += 1;
        let spin_id = core.spin_seq;
        core.roster_len = roster.len();
        core.state.reset_for_spin();

        // Jump without animation; the spin itself starts a turn later
        core.apply_transform(StripTransform::jump(offsets.start_offset_px, core.state.easing));

        debug!(
            "[Reel] Spin #{}: winner {} (index {}), strip {} -> {}",
            spin_id, winner.id, winner_index, offsets.start_strip_index, offsets.winner_strip_index
        );

        core.active = Some(ActiveSpin {
            spin_id,
            winner,
            winner_index,
            offsets,
            spin_duration: core.config.spin_duration(),
            bounce_duration: core.config.bounce_duration(),
            revolutions: core.config.revolutions,
        });

        timer::schedule(&self.shared, core, TimerKind::SpinStart, Wake::NextTurn, begin_spinning);

        Some(spin_id)
    }

    /// Snapshot of the reel state
    pub fn state(&self) -> ReelState {
        self.shared.lock().state.clone()
    }

    pub fn phase(&self) -> ReelPhase {
        self.shared.lock().state.phase
    }

    /// A spin has been requested and not yet settled
    pub fn is_spinning(&self) -> bool {
        self.shared.lock().active.is_some()
    }

    /// Recent winners, most recent first
    pub fn history(&self) -> Vec<RosterItem> {
        self.shared.lock().history.to_vec()
    }

    /// Timers still scheduled
    pub fn pending_timers(&self) -> usize {
        self.shared.lock().timers.pending()
    }

    pub fn config(&self) -> ReelConfig {
        self.shared.lock().config.clone()
    }

    /// Rows in the rendered strip for the last spun roster
    pub fn reel_len(&self) -> usize {
        let core = self.shared.lock();
        core.roster_len * core.config.strip_repetitions as usize
    }

    /// Visual hint for a strip row; `Plain` everywhere until a spin settles
    pub fn row_hint(&self, strip_index: usize) -> RowHint {
        let core = self.shared.lock();
        if core.active.is_some() {
            return RowHint::Plain;
        }
        match core.state.winner_strip_index {
            Some(winner) if strip_index == winner => RowHint::Winner,
            Some(winner) if winner.checked_sub(1) == Some(strip_index) => RowHint::NeighborAbove,
            Some(winner) if winner.checked_add(1) == Some(strip_index) => RowHint::NeighborBelow,
            _ => RowHint::Plain,
        }
    }
}

impl ReelCore {
    fn emit(&self, event: ReelEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }

    fn apply_transform(&mut self, transform: StripTransform) {
        self.state.offset_px = transform.offset_px;
        self.state.transition_duration_ms = transform.duration_ms;
        self.state.easing = transform.easing;
        self.emit(ReelEvent::Transform(transform));
    }

    fn set_phase(&mut self, phase: ReelPhase) {
        self.state.phase = phase;
        self.emit(ReelEvent::Phase(phase));
    }

    fn lights_off(&mut self) {
        self.timers.cancel_kind(TimerKind::Highlight);
        self.cycler.clear();
        if self.state.active_light.take().is_some() {
            self.emit(ReelEvent::ActiveLight(None));
        }
    }

    /// Drop the spin in flight along with every timer it scheduled
    fn preempt(&mut self) {
        let cancelled = self.timers.cancel_all();
        self.lights_off();

        if let Some(stale) = self.active.take() {
            debug!(
                "[Reel] Spin #{} preempted, {} timer(s) cancelled",
                stale.spin_id, cancelled
            );
            self.emit(ReelEvent::SpinCancelled {
                spin_id: stale.spin_id,
            });
        }
    }

    fn geometry(&self) -> StripGeometry {
        if !self.metrics.is_measured() {
            warn!("[Reel] Strip not measured yet, using default row/viewport heights");
        }
        let (item_height, viewport_height) = self.metrics.resolve(
            self.config.default_item_height_px,
            self.config.default_viewport_height_px,
        );
        StripGeometry::new(item_height, viewport_height, self.config.start_repetition)
    }
}

fn millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

fn begin_spinning(shared: &Arc<Mutex<ReelCore>>, core: &mut ReelCore) {
    let Some(active) = core.active.as_ref() else {
        return;
    };

    let started = Instant::now();
    let spin_duration = active.spin_duration;
    let bounce_duration = active.bounce_duration;
    let steps = HighlightCycler::step_count(active.revolutions, core.config.light_count);
    let step = HighlightCycler::step_interval(spin_duration, active.revolutions, core.config.light_count);
    let transform = StripTransform {
        offset_px: active.offsets.final_offset_px - core.config.overshoot_px,
        duration_ms: millis(spin_duration),
        easing: core.config.spin_easing,
    };

    core.set_phase(ReelPhase::Spinning);
    core.apply_transform(transform);

    timer::schedule_every(shared, core, TimerKind::Highlight, started, step, steps, advance_light);
    timer::schedule(
        shared,
        core,
        TimerKind::Bounce,
        Wake::At(started + spin_duration),
        begin_bouncing,
    );
    timer::schedule(
        shared,
        core,
        TimerKind::Settle,
        Wake::At(started + spin_duration + bounce_duration),
        settle,
    );
}

fn advance_light(_: &Arc<Mutex<ReelCore>>, core: &mut ReelCore) {
    let light = core.cycler.advance();
    core.state.active_light = Some(light);
    core.emit(ReelEvent::ActiveLight(Some(light)));
}

fn begin_bouncing(_: &Arc<Mutex<ReelCore>>, core: &mut ReelCore) {
    core.lights_off();

    let Some(active) = core.active.as_ref() else {
        return;
    };
    let transform = StripTransform {
        offset_px: active.offsets.final_offset_px,
        duration_ms: millis(active.bounce_duration),
        easing: core.config.bounce_easing,
    };

    core.set_phase(ReelPhase::Bouncing);
    core.apply_transform(transform);
}

fn settle(_: &Arc<Mutex<ReelCore>>, core: &mut ReelCore) {
    let Some(active) = core.active.take() else {
        return;
    };
    core.lights_off();

    core.state.selected = Some(active.winner.clone());
    core.state.result_visible = true;
    core.state.winner_strip_index = Some(active.offsets.winner_strip_index);
    core.state.last_winner_index = active.winner_index;
    core.history.push(active.winner.clone());

    info!(
        "[Reel] Spin #{} settled on {} ({})",
        active.spin_id, active.winner.label, active.winner.id
    );

    core.set_phase(ReelPhase::Settled);
    core.emit(ReelEvent::SpinComplete(SpinOutcome {
        spin_id: active.spin_id,
        winner: active.winner,
        winner_index: active.winner_index,
        offsets: active.offsets,
    }));
}
