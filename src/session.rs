use itertools::{EitherOrBoth, Itertools};
use std::time::Instant;

use crate::metrics::TestResult;

/// Session length used when nothing else is configured.
pub const DEFAULT_SESSION_SECS: u32 = 30;

/// Lifecycle stage of a session. Only ever moves forward; `reset` starts over
/// with a fresh [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub typed_input: Vec<char>,
    pub time_remaining: u32,
    pub phase: Phase,
    pub error_count: usize,
    pub started_at: Option<Instant>,
    pub result: Option<TestResult>,
}

impl SessionState {
    pub fn new(session_secs: u32) -> Self {
        Self {
            typed_input: Vec::new(),
            time_remaining: session_secs,
            phase: Phase::Idle,
            error_count: 0,
            started_at: None,
            result: None,
        }
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn has_finished(&self) -> bool {
        self.phase == Phase::Finished
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_SECS)
    }
}

/// Positions in `typed` that differ from `passage`. Anything typed past the
/// end of the passage is a mismatch.
pub fn count_errors(typed: &[char], passage: &[char]) -> usize {
    typed
        .iter()
        .zip_longest(passage)
        .filter(|pair| match pair {
            EitherOrBoth::Both(t, p) => t != p,
            EitherOrBoth::Left(_) => true,
            EitherOrBoth::Right(_) => false,
        })
        .count()
}

pub fn count_correct(typed: &[char], passage: &[char]) -> usize {
    typed
        .iter()
        .zip(passage)
        .filter(|(t, p)| t == p)
        .count()
}

pub fn is_full_match(typed: &[char], passage: &[char]) -> bool {
    typed == passage
}
