use std::time::Duration;

use assert_matches::assert_matches;
use tempfile::tempdir;
use typerator::clock::ManualClock;
use typerator::controller::Controller;
use typerator::metrics::{classify_performance, compute_accuracy, compute_wpm, TestResult, Tier};
use typerator::score_store::{FileScoreStore, MemoryScoreStore, ScoreStore};
use typerator::session::Phase;

fn session(passage: &str, secs: u32) -> Controller<MemoryScoreStore, ManualClock> {
    Controller::with_clock(passage, secs, MemoryScoreStore::default(), ManualClock::new())
}

#[test]
fn full_match_finishes_without_timeout() {
    let mut c = session("cat", 30);
    c.on_input_change("c");
    c.on_input_change("ca");
    c.on_input_change("cat");

    assert_eq!(c.phase(), Phase::Finished);
    assert_matches!(
        c.result(),
        Some(TestResult {
            total_chars: 3,
            error_count: 0,
            ..
        })
    );
    assert_eq!(c.time_remaining(), 30);
}

#[test]
fn timeout_with_nothing_left_in_the_buffer() {
    let mut c = session("cat", 30);
    c.on_input_change("c");
    c.on_input_change("");

    for _ in 0..30 {
        c.on_tick();
    }

    assert_eq!(c.phase(), Phase::Finished);
    let result = c.result().unwrap();
    assert_eq!(result.total_chars, 0);
    assert_eq!(result.accuracy, 100);
    assert_eq!(result.wpm, 0);
}

#[test]
fn ticks_before_any_input_do_nothing() {
    let mut c = session("cat", 30);
    for _ in 0..30 {
        assert!(c.on_tick().is_none());
    }

    assert_eq!(c.phase(), Phase::Idle);
    assert!(c.result().is_none());
}

#[test]
fn backspace_and_retype_clears_the_error() {
    let mut c = session("cat", 30);
    c.on_input_change("c");
    c.on_input_change("ca");
    c.on_input_change("cag");
    c.on_input_change("cat");

    assert_eq!(c.error_count(), 0);
    assert_eq!(c.result().unwrap().error_count, 0);
}

#[test]
fn reset_after_anything_returns_to_idle() {
    let mut c = session("cat", 30);
    c.on_input_change("cx");
    c.on_tick();
    c.on_tick();
    c.reset();

    assert_eq!(c.phase(), Phase::Idle);
    assert_eq!(c.time_remaining(), 30);
    assert!(c.typed_input().is_empty());

    c.on_tick();
    assert_eq!(c.phase(), Phase::Idle);
    assert_eq!(c.time_remaining(), 30);
    assert!(c.result().is_none());

    c.on_input_change("cat");
    c.reset();
    c.clock().advance(Duration::from_secs(60));
    assert!(c.poll_ticks().is_none());
    assert_eq!(c.phase(), Phase::Idle);
}

#[test]
fn error_count_tracks_latest_buffer() {
    let mut c = session("cat", 30);
    for (buffer, errors) in [
        ("x", 1),
        ("xa", 1),
        ("xat", 1),
        ("cat!", 1),
        ("", 0),
        ("dog", 3),
        ("dogs", 4),
    ] {
        c.on_input_change(buffer);
        assert_eq!(c.error_count(), errors, "buffer {buffer:?}");
    }
    assert_eq!(c.phase(), Phase::Running);
}

#[test]
fn metric_edge_cases() {
    assert_eq!(compute_accuracy(0, 0), 100);
    assert_eq!(compute_accuracy(12, 0), 100);
    assert_eq!(compute_wpm(12, 0), 0);
    assert_eq!(classify_performance(39, 100), Tier::Bad);
    assert_eq!(classify_performance(80, 100), Tier::Perfect);
    assert_eq!(classify_performance(40, 0), Tier::Bad);
}

#[test]
fn finished_session_writes_score_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("last_score.json");
    let clock = ManualClock::new();
    let mut c = Controller::with_clock("hello", 30, FileScoreStore::with_path(&path), clock.clone());

    c.on_input_change("h");
    clock.advance(Duration::from_secs(3));
    c.on_input_change("hello");

    let saved = FileScoreStore::with_path(&path).load_last().unwrap().unwrap();
    assert_eq!(saved.result, *c.result().unwrap());
    // 5 chars in 3s
    assert_eq!(saved.result.wpm, 20);
}
