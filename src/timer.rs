//! The interval scheduler: the state machine that sequences work and break
//! intervals and drives the one-second countdown.

use std::time::Duration;

use tracing::debug;

pub const WORK_MIN: u32 = 25;
pub const SHORT_BREAK_MIN: u32 = 5;
pub const LONG_BREAK_MIN: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalKind {
    Work,
    ShortBreak,
    LongBreak,
}

impl IntervalKind {
    /// Selects the kind of the `rep`-th interval (1-based). Every 8th rep is
    /// a long break, every other even rep a short break, the rest are work.
    /// The long-break check runs first so multiples of 8 never fall into the
    /// short-break branch.
    pub fn for_rep(rep: u32) -> Self {
        if rep % 8 == 0 {
            IntervalKind::LongBreak
        } else if rep % 2 == 0 {
            IntervalKind::ShortBreak
        } else {
            IntervalKind::Work
        }
    }

    pub fn duration_secs(self) -> u32 {
        match self {
            IntervalKind::Work => WORK_MIN * 60,
            IntervalKind::ShortBreak => SHORT_BREAK_MIN * 60,
            IntervalKind::LongBreak => LONG_BREAK_MIN * 60,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IntervalKind::Work => "Work",
            IntervalKind::ShortBreak | IntervalKind::LongBreak => "Break",
        }
    }
}

/// Identifies one scheduled tick callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn new(id: u64) -> Self {
        TickHandle(id)
    }
}

/// The scheduling capability the host event loop provides. `cancel` must
/// tolerate handles that were never armed or have already fired.
pub trait TickScheduler {
    fn schedule_after(&mut self, delay: Duration) -> TickHandle;
    fn cancel(&mut self, handle: TickHandle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running(IntervalKind),
}

/// State-change notifications for the shell to render or alert on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    IntervalStarted(IntervalKind),
    IntervalFinished(IntervalKind),
}

pub struct IntervalScheduler<S> {
    /// Intervals begun since the last reset (work and break alike).
    reps: u32,
    /// At most one tick may be outstanding at a time.
    pending: Option<TickHandle>,
    /// The displayed remaining-seconds count.
    remaining: u32,
    display: String,
    events: Vec<TimerEvent>,
    scheduler: S,
}

impl<S: TickScheduler> IntervalScheduler<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            reps: 0,
            pending: None,
            remaining: 0,
            display: "00:00".to_string(),
            events: Vec::new(),
            scheduler,
        }
    }

    /// Begins the next interval: bumps the rep count, loads the new duration
    /// and fires the first tick immediately.
    pub fn start(&mut self) {
        self.reps += 1;
        let kind = IntervalKind::for_rep(self.reps);
        self.remaining = kind.duration_secs();
        debug!(rep = self.reps, ?kind, "interval started");
        self.events.push(TimerEvent::IntervalStarted(kind));
        self.tick();
    }

    /// One countdown step. Shows the current remaining time, then either arms
    /// the next tick or, at zero, finishes the interval and rolls straight
    /// into the next one.
    pub fn tick(&mut self) {
        self.display = format_clock(self.remaining);
        if self.remaining > 0 {
            self.remaining -= 1;
            self.pending = Some(self.scheduler.schedule_after(Duration::from_secs(1)));
        } else {
            self.pending = None;
            let kind = IntervalKind::for_rep(self.reps);
            debug!(rep = self.reps, ?kind, "interval finished");
            self.events.push(TimerEvent::IntervalFinished(kind));
            self.start();
        }
    }

    /// Cancels any outstanding tick and returns to the idle state. Safe to
    /// call at any point, including before the first start.
    pub fn reset(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
        self.reps = 0;
        self.remaining = 0;
        self.display = "00:00".to_string();
        debug!("timer reset");
    }

    pub fn phase(&self) -> Phase {
        if self.reps == 0 {
            Phase::Idle
        } else {
            // Kind is always derived from the rep count, never stored.
            Phase::Running(IntervalKind::for_rep(self.reps))
        }
    }

    pub fn is_idle(&self) -> bool {
        self.reps == 0
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    /// Completed work sessions. Break intervals bump `reps` too; the floor
    /// division corrects for that because breaks always follow work.
    pub fn tally(&self) -> u32 {
        self.reps / 2
    }

    pub fn drain_events(&mut self) -> Vec<TimerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

/// Minutes unpadded, seconds always two digits: 65 -> "1:05", 600 -> "10:00".
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
