//! Cancellable timers
//!
//! Every scheduling call returns a [`TimerId`] that stays registered in the
//! owner's [`Timers`] until it fires or is cancelled. A timer task runs its
//! action only if its id is still registered once it holds the owner's lock,
//! so a cancelled timer never acts, even when its task had already woken.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Start of the Spinning phase, one scheduling turn after the reset
    SpinStart,
    /// End of the spin duration
    Bounce,
    /// End of spin + bounce
    Settle,
    /// Recurring highlight step
    Highlight,
}

/// When a one-shot timer wakes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// Yield one scheduling turn, then run
    NextTurn,
    /// Run at a deadline
    At(Instant),
}

struct Armed {
    kind: TimerKind,
    task: JoinHandle<()>,
}

/// Registry of live timers
#[derive(Default)]
pub struct Timers {
    next_id: u64,
    live: HashMap<TimerId, Armed>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    fn reserve(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId(self.next_id)
    }

    fn arm(&mut self, id: TimerId, kind: TimerKind, task: JoinHandle<()>) {
        self.live.insert(id, Armed { kind, task });
    }

    /// Timer is still scheduled
    pub fn is_live(&self, id: TimerId) -> bool {
        self.live.contains_key(&id)
    }

    /// Consume a timer that reached its deadline. Returns false if it was cancelled.
    fn fire(&mut self, id: TimerId) -> bool {
        self.live.remove(&id).is_some()
    }

    /// Cancel one timer
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.live.remove(&id) {
            Some(armed) => {
                armed.task.abort();
                true
            }
            None => false,
        }
    }

    /// Cancel every timer of one kind
    pub fn cancel_kind(&mut self, kind: TimerKind) -> usize {
        let ids: Vec<TimerId> = self
            .live
            .iter()
            .filter(|(_, armed)| armed.kind == kind)
            .map(|(id, _)| *id)
            .collect();
        ids.into_iter().filter(|id| self.cancel(*id)).count()
    }

    /// Cancel everything
    pub fn cancel_all(&mut self) -> usize {
        let count = self.live.len();
        for (_, armed) in self.live.drain() {
            armed.task.abort();
        }
        count
    }

    pub fn pending(&self) -> usize {
        self.live.len()
    }

    pub fn pending_kind(&self, kind: TimerKind) -> usize {
        self.live.values().filter(|armed| armed.kind == kind).count()
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

/// State that owns a [`Timers`] registry
pub trait TimerHost: Send + 'static {
    fn timers(&mut self) -> &mut Timers;
}

/// Action run with the host locked
pub type TimerAction<S> = fn(&Arc<Mutex<S>>, &mut S);

/// Schedule a one-shot action.
///
/// Must be called with `host` locked out of `shared`, inside a tokio runtime.
pub fn schedule<S: TimerHost>(
    shared: &Arc<Mutex<S>>,
    host: &mut S,
    kind: TimerKind,
    wake: Wake,
    action: TimerAction<S>,
) -> TimerId {
    let timers = host.timers();
    let id = timers.reserve();
    let weak = Arc::downgrade(shared);

    let task = tokio::spawn(async move {
        match wake {
            Wake::NextTurn => tokio::task::yield_now().await,
            Wake::At(deadline) => tokio::time::sleep_until(deadline).await,
        }
        run_once(&weak, id, action);
    });

    timers.arm(id, kind, task);
    id
}

fn run_once<S: TimerHost>(weak: &Weak<Mutex<S>>, id: TimerId, action: TimerAction<S>) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let mut host = shared.lock();
    if host.timers().fire(id) {
        action(&shared, &mut *host);
    }
}

/// Schedule a recurring action: first run at `first`, then every `period`,
/// `ticks` runs in total. The timer retires itself after the last run.
pub fn schedule_every<S: TimerHost>(
    shared: &Arc<Mutex<S>>,
    host: &mut S,
    kind: TimerKind,
    first: Instant,
    period: Duration,
    ticks: u32,
    action: TimerAction<S>,
) -> TimerId {
    let timers = host.timers();
    let id = timers.reserve();
    let weak = Arc::downgrade(shared);
    let period = period.max(Duration::from_millis(1));

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(first, period);
        for tick in 0..ticks {
            interval.tick().await;
            let last = tick + 1 == ticks;
            if !run_tick(&weak, id, last, action) {
                return;
            }
        }
    });

    timers.arm(id, kind, task);
    id
}

fn run_tick<S: TimerHost>(weak: &Weak<Mutex<S>>, id: TimerId, last: bool, action: TimerAction<S>) -> bool {
    let Some(shared) = weak.upgrade() else {
        return false;
    };
    let mut host = shared.lock();
    let live = if last {
        host.timers().fire(id)
    } else {
        host.timers().is_live(id)
    };
    if live {
        action(&shared, &mut *host);
    }
    live
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        timers: Timers,
        origin: Instant,
        hits: Vec<Duration>,
    }

    impl TimerHost for Counter {
        fn timers(&mut self) -> &mut Timers {
            &mut self.timers
        }
    }

    fn hit(_: &Arc<Mutex<Counter>>, counter: &mut Counter) {
        counter.hits.push(Instant::now() - counter.origin);
    }

    fn shared() -> Arc<Mutex<Counter>> {
        Arc::new(Mutex::new(Counter {
            timers: Timers::new(),
            origin: Instant::now(),
            hits: Vec::new(),
        }))
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_shot_fires_at_deadline() {
        let shared = shared();
        let start = Instant::now();
        {
            let mut host = shared.lock();
            schedule(
                &shared,
                &mut *host,
                TimerKind::Bounce,
                Wake::At(start + Duration::from_millis(300)),
                hit,
            );
            assert_eq!(host.timers.pending(), 1);
        }

        tokio::time::sleep(Duration::from_millis(1000)).await;

        let host = shared.lock();
        assert_eq!(host.hits, vec![Duration::from_millis(300)]);
        assert_eq!(host.timers.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_turn_runs_without_time_passing() {
        let shared = shared();
        {
            let mut host = shared.lock();
            schedule(&shared, &mut *host, TimerKind::SpinStart, Wake::NextTurn, hit);
        }
        assert!(shared.lock().hits.is_empty());

        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(shared.lock().hits, vec![Duration::ZERO]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_timer_never_runs() {
        let shared = shared();
        let start = Instant::now();
        {
            let mut host = shared.lock();
            let id = schedule(
                &shared,
                &mut *host,
                TimerKind::Settle,
                Wake::At(start + Duration::from_millis(100)),
                hit,
            );
            schedule(&shared, &mut *host, TimerKind::SpinStart, Wake::NextTurn, hit);
            assert!(host.timers.cancel(id));
            assert!(!host.timers.is_live(id));
            assert!(!host.timers.cancel(id));
            assert_eq!(host.timers.cancel_all(), 1);
        }

        tokio::time::sleep(Duration::from_millis(500)).await;

        let host = shared.lock();
        assert!(host.hits.is_empty());
        assert_eq!(host.timers.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recurring_runs_bounded_ticks() {
        let shared = shared();
        let start = Instant::now();
        {
            let mut host = shared.lock();
            schedule_every(
                &shared,
                &mut *host,
                TimerKind::Highlight,
                start,
                Duration::from_millis(200),
                4,
                hit,
            );
        }

        tokio::time::sleep(Duration::from_millis(2000)).await;

        let host = shared.lock();
        let times: Vec<u128> = host.hits.iter().map(|t| t.as_millis()).collect();
        assert_eq!(times, vec![0, 200, 400, 600]);
        assert_eq!(host.timers.pending_kind(TimerKind::Highlight), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_kind_stops_recurring() {
        let shared = shared();
        let start = Instant::now();
        {
            let mut host = shared.lock();
            schedule_every(
                &shared,
                &mut *host,
                TimerKind::Highlight,
                start,
                Duration::from_millis(100),
                10,
                hit,
            );
        }

        tokio::time::sleep(Duration::from_millis(250)).await;
        let cancelled = shared.lock().timers.cancel_kind(TimerKind::Highlight);
        assert_eq!(cancelled, 1);
        tokio::time::sleep(Duration::from_millis(1000)).await;

        assert_eq!(shared.lock().hits.len(), 3);
    }
}
