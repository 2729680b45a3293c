use std::time::Duration;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock, TickSchedule};
use crate::metrics::{self, TestResult, Tier};
use crate::score_store::ScoreStore;
use crate::session::{self, Phase, SessionState};

/// Drives one typing session at a time: takes whole-buffer input changes and
/// one-second ticks, decides when the session ends and scores it.
///
/// Every entry point runs to completion and leaves a consistent
/// [`SessionState`]. Once the session is finished, further input and ticks
/// are ignored until [`Controller::reset`] or [`Controller::restart`].
#[derive(Debug)]
pub struct Controller<S: ScoreStore, C: Clock = SystemClock> {
    passage: Vec<char>,
    passage_text: String,
    session_secs: u32,
    state: SessionState,
    schedule: TickSchedule,
    store: S,
    clock: C,
}

impl<S: ScoreStore> Controller<S> {
    pub fn new(passage: impl Into<String>, session_secs: u32, store: S) -> Self {
        Self::with_clock(passage, session_secs, store, SystemClock)
    }
}

impl<S: ScoreStore, C: Clock> Controller<S, C> {
    pub fn with_clock(passage: impl Into<String>, session_secs: u32, store: S, clock: C) -> Self {
        let passage_text = passage.into();
        Self {
            passage: passage_text.chars().collect(),
            passage_text,
            session_secs,
            state: SessionState::new(session_secs),
            schedule: TickSchedule::default(),
            store,
            clock,
        }
    }

    /// Feed the full current input buffer. Returns the result if this change
    /// completed the session.
    pub fn on_input_change(&mut self, input: &str) -> Option<TestResult> {
        if self.state.has_finished() {
            return None;
        }

        let typed: Vec<char> = input.chars().collect();

        if self.state.phase == Phase::Idle && !typed.is_empty() {
            self.start();
        }

        self.state.error_count = session::count_errors(&typed, &self.passage);
        self.state.typed_input = typed;

        if self.state.phase == Phase::Running
            && session::is_full_match(&self.state.typed_input, &self.passage)
        {
            return Some(self.finish());
        }

        None
    }

    /// One second of the countdown. Returns the result if time ran out.
    pub fn on_tick(&mut self) -> Option<TestResult> {
        if self.state.phase != Phase::Running {
            return None;
        }

        self.state.time_remaining = self.state.time_remaining.saturating_sub(1);

        if self.state.time_remaining == 0 {
            debug!("time is up");
            return Some(self.finish());
        }

        None
    }

    /// Deliver every tick whose deadline has passed.
    pub fn poll_ticks(&mut self) -> Option<TestResult> {
        let due = self.schedule.take_due(self.clock.now());
        for _ in 0..due {
            if let Some(result) = self.on_tick() {
                return Some(result);
            }
        }
        None
    }

    /// How long the event loop may wait before the next tick is due.
    pub fn time_until_next_tick(&self) -> Option<Duration> {
        self.schedule.time_until_next(self.clock.now())
    }

    /// Throw the session away and start over on the same passage.
    pub fn reset(&mut self) {
        debug!(from = %self.state.phase, "session reset");
        self.schedule.cancel();
        self.state = SessionState::new(self.session_secs);
    }

    /// Reset and switch to a new passage.
    pub fn restart(&mut self, passage: impl Into<String>) {
        self.reset();
        self.passage_text = passage.into();
        self.passage = self.passage_text.chars().collect();
    }

    fn start(&mut self) {
        let now = self.clock.now();
        self.state.phase = Phase::Running;
        self.state.started_at = Some(now);
        self.schedule.arm(now);
        debug!(
            passage_chars = self.passage.len(),
            session_secs = self.session_secs,
            "session started"
        );
    }

    fn finish(&mut self) -> TestResult {
        self.schedule.cancel();

        let elapsed_secs = match self.state.started_at {
            Some(started_at) => self
                .clock
                .now()
                .saturating_duration_since(started_at)
                .as_secs(),
            None => u64::from(self.session_secs.saturating_sub(self.state.time_remaining)),
        };

        let typed = &self.state.typed_input;
        let correct_chars = session::count_correct(typed, &self.passage);
        let result = metrics::evaluate(
            correct_chars,
            elapsed_secs,
            typed.len(),
            self.state.error_count,
        );

        self.state.phase = Phase::Finished;
        self.state.result = Some(result);

        info!(
            wpm = result.wpm,
            accuracy = result.accuracy,
            total_chars = result.total_chars,
            errors = result.error_count,
            elapsed_secs,
            "session finished"
        );

        if let Err(e) = self.store.save_last(&result) {
            warn!("failed to save score: {e}");
        }

        result
    }

    pub fn passage(&self) -> &[char] {
        &self.passage
    }

    pub fn passage_text(&self) -> &str {
        &self.passage_text
    }

    pub fn typed_input(&self) -> &[char] {
        &self.state.typed_input
    }

    pub fn time_remaining(&self) -> u32 {
        self.state.time_remaining
    }

    pub fn session_secs(&self) -> u32 {
        self.session_secs
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn error_count(&self) -> usize {
        self.state.error_count
    }

    pub fn result(&self) -> Option<&TestResult> {
        self.state.result.as_ref()
    }

    pub fn tier(&self) -> Option<Tier> {
        self.state.result.map(|r| r.tier())
    }

    pub fn has_started(&self) -> bool {
        self.state.has_started()
    }

    pub fn has_finished(&self) -> bool {
        self.state.has_finished()
    }

    pub fn is_ticking(&self) -> bool {
        self.schedule.is_armed()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
