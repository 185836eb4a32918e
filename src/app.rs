use std::io::{self, Write};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::config::Config;
use crate::timer::{IntervalKind, IntervalScheduler, TickHandle, TickScheduler, TimerEvent};

/// How long the event loop waits for input when no tick is close.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Production tick scheduler, pumped by the event loop. Holds at most one
/// armed deadline; the scheduler core never asks for more than one.
pub struct HostScheduler {
    armed: Option<(TickHandle, Instant)>,
    next_id: u64,
}

impl HostScheduler {
    pub fn new() -> Self {
        Self {
            armed: None,
            next_id: 0,
        }
    }

    /// Time left until the armed deadline, `None` when nothing is scheduled.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.armed.map(|(_, at)| at.saturating_duration_since(now))
    }

    /// Disarms and reports true once the deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.armed {
            Some((_, at)) if at <= now => {
                self.armed = None;
                true
            }
            _ => false,
        }
    }
}

impl TickScheduler for HostScheduler {
    fn schedule_after(&mut self, delay: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle::new(self.next_id);
        self.armed = Some((handle, Instant::now() + delay));
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        // Stale or never-armed handles are ignored.
        if matches!(self.armed, Some((armed, _)) if armed == handle) {
            self.armed = None;
        }
    }
}

pub struct App {
    pub timer: IntervalScheduler<HostScheduler>,
    pub config: Config,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            timer: IntervalScheduler::new(HostScheduler::new()),
            config,
            should_quit: false,
        }
    }

    /// The start control is disabled while a countdown is in progress, so a
    /// press only takes effect from idle.
    pub fn start_pressed(&mut self) {
        if self.timer.is_idle() {
            self.timer.start();
            self.flush_events();
        }
    }

    pub fn reset_pressed(&mut self) {
        self.timer.reset();
        self.flush_events();
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Fires the tick once its deadline has passed. Called every loop turn.
    pub fn pump(&mut self, now: Instant) {
        if self.timer.scheduler_mut().take_due(now) {
            self.timer.tick();
            self.flush_events();
        }
    }

    /// Poll timeout for the event loop: until the next tick, capped so key
    /// presses stay responsive while idle.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.timer
            .scheduler()
            .time_until_due(now)
            .map_or(IDLE_POLL, |until| until.min(IDLE_POLL))
    }

    fn flush_events(&mut self) {
        for event in self.timer.drain_events() {
            match event {
                TimerEvent::IntervalStarted(kind) => {
                    info!(?kind, "interval running");
                }
                TimerEvent::IntervalFinished(kind) => self.alert(kind),
            }
        }
    }

    /// One bell plus one desktop notification per completed interval.
    fn alert(&self, kind: IntervalKind) {
        info!(?kind, tally = self.timer.tally(), "interval finished");
        ring_bell();
        let body = match kind {
            IntervalKind::Work => "Work session done. Time for a break.",
            IntervalKind::ShortBreak | IntervalKind::LongBreak => "Break over. Back to work.",
        };
        if let Err(e) = notify_rust::Notification::new()
            .summary("Pomodoro")
            .body(body)
            .appname("tomatui")
            .show()
        {
            warn!("failed to send notification: {e}");
        }
    }
}

fn ring_bell() {
    let mut stdout = io::stdout();
    let _ = stdout.write_all(b"\x07");
    let _ = stdout.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::Phase;

    #[test]
    fn start_is_ignored_while_running() {
        let mut app = App::new(Config::default());
        app.start_pressed();
        assert_eq!(app.timer.phase(), Phase::Running(IntervalKind::Work));
        app.start_pressed();
        app.start_pressed();
        // Still the first interval.
        assert_eq!(app.timer.phase(), Phase::Running(IntervalKind::Work));
        assert_eq!(app.timer.display(), "25:00");
    }

    #[test]
    fn reset_reenables_start() {
        let mut app = App::new(Config::default());
        app.start_pressed();
        app.reset_pressed();
        assert_eq!(app.timer.phase(), Phase::Idle);
        app.start_pressed();
        assert_eq!(app.timer.phase(), Phase::Running(IntervalKind::Work));
    }

    #[test]
    fn host_scheduler_fires_once_after_its_deadline() {
        let mut sched = HostScheduler::new();
        let base = Instant::now();
        sched.schedule_after(Duration::from_secs(1));
        assert!(!sched.take_due(base));
        assert!(sched.take_due(base + Duration::from_secs(2)));
        // Already disarmed.
        assert!(!sched.take_due(base + Duration::from_secs(3)));
    }

    #[test]
    fn host_scheduler_cancel_disarms_and_ignores_stale_handles() {
        let mut sched = HostScheduler::new();
        let stale = sched.schedule_after(Duration::from_secs(1));
        let armed = sched.schedule_after(Duration::from_secs(1));
        sched.cancel(stale);
        assert!(sched.time_until_due(Instant::now()).is_some());
        sched.cancel(armed);
        assert!(sched.time_until_due(Instant::now()).is_none());
        assert!(!sched.take_due(Instant::now() + Duration::from_secs(5)));
    }
}
