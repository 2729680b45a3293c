use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Countdown granularity of a running session.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Source of "now" for a session.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }
}

/// Pending-tick handle owned by a session. Armed when the session starts
/// running, cancelled when it finishes or is reset.
#[derive(Debug, Clone, Copy)]
pub struct TickSchedule {
    period: Duration,
    next_due: Option<Instant>,
}

impl TickSchedule {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            next_due: None,
        }
    }

    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Time left until the next tick, or `None` when nothing is scheduled.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Number of ticks whose deadline has passed. Advances the schedule past
    /// all of them.
    pub fn take_due(&mut self, now: Instant) -> u32 {
        let mut due = 0;
        while let Some(deadline) = self.next_due {
            if deadline > now {
                break;
            }
            due += 1;
            self.next_due = Some(deadline + self.period);
        }
        due
    }
}

impl Default for TickSchedule {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}
