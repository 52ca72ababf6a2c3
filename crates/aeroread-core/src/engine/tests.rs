use std::{cell::Cell, rc::Rc};

use super::*;
use crate::text::segment;

fn plain(count: usize) -> Vec<WordUnit> {
    segment(&vec!["plain"; count].join(" "))
}

fn engine_at(words: Vec<WordUnit>, wpm: u16) -> PlaybackEngine {
    PlaybackEngine::new(words, 0, LiveRate::new(wpm))
}

fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
    let count = Rc::new(Cell::new(0u32));
    let handle = count.clone();
    (count, move || handle.set(handle.get() + 1))
}

#[test]
fn empty_sequence_never_starts() {
    let mut engine = engine_at(Vec::new(), 600);
    engine.play();

    assert!(!engine.is_playing());
    assert_eq!(engine.pending_frame(), None);
    assert!(engine.current_word().is_none());
    assert!(engine.current_chunk().is_none());
    assert_eq!(engine.progress(), 0.0);
    assert_eq!(engine.tick(1_000), TickResult::Ignored);
}

#[test]
fn advances_once_interval_is_banked() {
    let mut engine = engine_at(plain(5), 600);
    engine.play();
    assert_eq!(engine.phase(), PlaybackPhase::Running);

    assert_eq!(engine.tick(0), TickResult::Waiting);
    assert_eq!(engine.tick(50), TickResult::Waiting);
    assert_eq!(engine.tick(100), TickResult::Advanced);
    assert_eq!(engine.position(), 1);
    assert_eq!(engine.accumulated_ms(), 0.0);
}

#[test]
fn sentence_end_dwells_longer() {
    let mut engine = engine_at(segment("end. next more"), 600);
    engine.play();

    assert_eq!(engine.tick(0), TickResult::Waiting);
    assert_eq!(engine.tick(200), TickResult::Waiting);
    assert_eq!(engine.tick(221), TickResult::Advanced);
    assert_eq!(engine.current_word().map(WordUnit::text), Some("next"));
}

#[test]
fn rate_change_applies_on_next_tick() {
    let mut engine = engine_at(plain(5), 600);
    let rate = engine.rate_input();
    engine.play();

    assert_eq!(engine.tick(0), TickResult::Waiting);
    assert_eq!(engine.tick(60), TickResult::Waiting);

    rate.set(1_200);
    assert_eq!(engine.tick(61), TickResult::Advanced);
    assert!(engine.is_playing());
}

#[test]
fn groups_advance_together() {
    let mut engine = engine_at(plain(6), 300);
    engine.set_group_size(GroupSize::Two);

    let chunk = engine.current_chunk().unwrap();
    assert_eq!(chunk.display_text(), "plain plain");
    assert!(chunk.is_grouped());

    engine.play();
    assert_eq!(engine.tick(0), TickResult::Waiting);
    assert_eq!(engine.tick(399), TickResult::Waiting);
    assert_eq!(engine.tick(400), TickResult::Advanced);
    assert_eq!(engine.position(), 2);
}

#[test]
fn chunk_shrinks_at_the_end() {
    let mut engine = engine_at(segment("a b c d"), 600);
    engine.set_group_size(GroupSize::Three);

    engine.seek(2);
    let chunk = engine.current_chunk().unwrap();
    assert_eq!(chunk.display_text(), "c d");
    assert!(chunk.is_grouped());

    engine.seek(3);
    let chunk = engine.current_chunk().unwrap();
    assert_eq!(chunk.words().len(), 1);
    assert_eq!(chunk.words()[0].text(), "d");
    assert!(!chunk.is_grouped());
}

#[test]
fn completion_fires_exactly_once() {
    let mut engine = engine_at(plain(3), 600);
    let (fired, handler) = counter();
    engine.set_on_complete(handler);
    engine.play();

    assert_eq!(engine.tick(0), TickResult::Waiting);
    assert_eq!(engine.tick(100), TickResult::Advanced);
    assert_eq!(engine.tick(200), TickResult::Advanced);
    assert_eq!(
        engine.tick(300),
        TickResult::Finished(Completion::SequenceComplete)
    );

    assert_eq!(engine.position(), 2);
    assert!(!engine.is_playing());
    assert_eq!(engine.phase(), PlaybackPhase::Finished);
    assert_eq!(fired.get(), 1);

    assert_eq!(engine.tick(400), TickResult::Ignored);
    assert_eq!(engine.tick(5_000), TickResult::Ignored);
    assert_eq!(fired.get(), 1);
}

#[test]
fn chapter_handler_takes_precedence() {
    let mut engine = engine_at(plain(1), 600);
    let (plain_fired, plain_handler) = counter();
    let (chapter_fired, chapter_handler) = counter();
    engine.set_on_complete(plain_handler);
    engine.set_on_chapter_complete(chapter_handler);
    engine.play();

    assert_eq!(engine.tick(0), TickResult::Waiting);
    assert_eq!(
        engine.tick(100),
        TickResult::Finished(Completion::ChapterBoundary)
    );
    assert_eq!(chapter_fired.get(), 1);
    assert_eq!(plain_fired.get(), 0);

    engine.clear_on_chapter_complete();
    engine.play();
    assert_eq!(engine.tick(0), TickResult::Waiting);
    assert_eq!(
        engine.tick(100),
        TickResult::Finished(Completion::SequenceComplete)
    );
    assert_eq!(plain_fired.get(), 1);
}

#[test]
fn grouped_completion_clamps_to_last_word() {
    let mut engine = engine_at(plain(4), 300);
    engine.set_group_size(GroupSize::Two);
    engine.play();

    assert_eq!(engine.tick(0), TickResult::Waiting);
    assert_eq!(engine.tick(400), TickResult::Advanced);
    assert_eq!(
        engine.tick(800),
        TickResult::Finished(Completion::SequenceComplete)
    );
    assert_eq!(engine.position(), 3);
}

#[test]
fn pause_recoils_once() {
    let mut engine = engine_at(plain(20), 600);
    engine.seek(12);
    engine.play();
    assert_eq!(engine.tick(0), TickResult::Waiting);
    assert_eq!(engine.tick(40), TickResult::Waiting);

    engine.pause();
    assert_eq!(engine.position(), 7);
    assert_eq!(engine.accumulated_ms(), 0.0);
    assert_eq!(engine.phase(), PlaybackPhase::Idle);

    engine.pause();
    assert_eq!(engine.position(), 7);
}

#[test]
fn recoil_stops_at_zero() {
    let mut engine = engine_at(plain(10), 600);
    engine.seek(2);
    engine.play();
    engine.pause();
    assert_eq!(engine.position(), 0);
}

#[test]
fn pause_cancels_the_pending_frame() {
    let mut engine = engine_at(plain(10), 600);
    engine.seek(6);
    engine.play();
    let frame = engine.pending_frame().unwrap();

    engine.pause();
    assert_eq!(engine.pending_frame(), None);
    assert_eq!(engine.on_frame(frame, 10_000), TickResult::Ignored);
    assert_eq!(engine.tick(20_000), TickResult::Ignored);
    assert_eq!(engine.position(), 1);
}

#[test]
fn reset_cancels_the_loop() {
    let mut engine = engine_at(plain(10), 600);
    engine.seek(4);
    engine.play();
    assert_eq!(engine.tick(0), TickResult::Waiting);
    let frame = engine.pending_frame().unwrap();

    engine.reset();
    assert_eq!(engine.position(), 0);
    assert!(!engine.is_playing());
    assert_eq!(engine.pending_frame(), None);
    assert_eq!(engine.on_frame(frame, 1_000), TickResult::Ignored);
    assert_eq!(engine.position(), 0);
}

#[test]
fn restarting_the_loop_orphans_old_frames() {
    let mut engine = engine_at(plain(10), 600);
    engine.seek(6);
    engine.play();
    let first_loop = engine.pending_frame().unwrap();

    engine.pause();
    engine.play();
    let second_loop = engine.pending_frame().unwrap();
    assert_ne!(first_loop, second_loop);

    assert_eq!(engine.on_frame(first_loop, 0), TickResult::Ignored);
    assert_eq!(engine.on_frame(second_loop, 0), TickResult::Waiting);

    let stale = engine.pending_frame().unwrap();
    engine.set_group_size(GroupSize::Two);
    assert_eq!(engine.on_frame(stale, 500), TickResult::Ignored);
    assert_eq!(engine.position(), 1);
}

#[test]
fn rewind_clamps_and_keeps_play_state() {
    let mut engine = engine_at(plain(10), 600);
    engine.seek(3);
    engine.rewind(DEFAULT_REWIND_WORDS);
    assert_eq!(engine.position(), 0);
    assert!(!engine.is_playing());

    engine.seek(8);
    engine.play();
    engine.rewind(2);
    assert_eq!(engine.position(), 6);
    assert!(engine.is_playing());
}

#[test]
fn seek_stays_in_range() {
    let mut engine = engine_at(plain(4), 600);
    engine.seek(1_000);
    assert_eq!(engine.position(), 3);
    engine.seek(0);
    assert_eq!(engine.position(), 0);
}

#[test]
fn play_from_the_end_restarts() {
    let mut engine = engine_at(plain(4), 600);
    engine.seek(3);
    engine.play();
    assert_eq!(engine.position(), 0);
    assert!(engine.is_playing());
}

#[test]
fn loading_words_resets_elapsed_tracking() {
    let mut engine = engine_at(plain(5), 600);
    engine.play();
    assert_eq!(engine.tick(0), TickResult::Waiting);
    assert_eq!(engine.tick(50), TickResult::Waiting);

    engine.load_words(plain(3), 0);
    assert!(engine.is_playing());
    assert_eq!(engine.tick(10_000), TickResult::Waiting);
    assert_eq!(engine.position(), 0);
    assert_eq!(engine.tick(10_100), TickResult::Advanced);
}

#[test]
fn loading_words_clamps_start_index() {
    let mut engine = engine_at(plain(10), 600);
    engine.load_words(plain(3), 99);
    assert_eq!(engine.position(), 2);
}

#[test]
fn loading_empty_words_stops_playback() {
    let mut engine = engine_at(plain(5), 600);
    engine.play();
    engine.load_words(Vec::new(), 0);
    assert_eq!(engine.pending_frame(), None);
    assert_eq!(engine.tick(100), TickResult::Ignored);
    assert!(engine.current_word().is_none());
}

#[test]
fn progress_is_a_percentage() {
    let mut engine = engine_at(plain(4), 600);
    engine.seek(2);
    assert_eq!(engine.progress(), 50.0);
}

#[test]
fn group_size_is_validated() {
    assert_eq!(GroupSize::try_from(2), Ok(GroupSize::Two));
    assert_eq!(GroupSize::try_from(0), Err(ConfigError::InvalidGroupSize(0)));
    assert_eq!(GroupSize::try_from(4), Err(ConfigError::InvalidGroupSize(4)));
}

#[test]
fn zero_rate_uses_fallback_interval() {
    let mut engine = engine_at(plain(3), 0);
    engine.play();
    assert_eq!(engine.tick(0), TickResult::Waiting);
    assert_eq!(engine.tick(299), TickResult::Waiting);
    assert_eq!(engine.tick(300), TickResult::Advanced);
}
