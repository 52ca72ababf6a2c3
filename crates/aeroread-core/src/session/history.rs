//! Reading history: the open session plus the last few finished ones.

use std::collections::VecDeque;

use log::info;

use crate::text::preview;

pub const MAX_SESSIONS: usize = 5;
const PREVIEW_CHARS: usize = 50;

#[derive(Clone, Debug, PartialEq)]
pub struct ReadingRecord {
    pub preview: String,
    pub word_count: usize,
    pub wpm: u16,
    pub started_at_ms: u64,
    pub ended_at_ms: Option<u64>,
    /// 0..=100
    pub progress: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistoryStats {
    pub average_wpm: u16,
    pub total_words: usize,
    pub total_time_ms: u64,
    pub session_count: usize,
}

#[derive(Clone, Debug, Default)]
pub struct ReadingHistory {
    current: Option<ReadingRecord>,
    sessions: VecDeque<ReadingRecord>,
}

impl ReadingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&ReadingRecord> {
        self.current.as_ref()
    }

    /// Finished sessions, newest first.
    pub fn sessions(&self) -> impl Iterator<Item = &ReadingRecord> {
        self.sessions.iter()
    }

    pub fn start(&mut self, text: &str, word_count: usize, wpm: u16, now_ms: u64) {
        self.current = Some(ReadingRecord {
            preview: preview(text, PREVIEW_CHARS),
            word_count,
            wpm,
            started_at_ms: now_ms,
            ended_at_ms: None,
            progress: 0.0,
        });
    }

    pub fn update(&mut self, progress: f32, wpm: u16) {
        if let Some(current) = self.current.as_mut() {
            current.progress = progress;
            current.wpm = wpm;
        }
    }

    /// Close the open session and keep it, dropping the oldest past
    /// [`MAX_SESSIONS`].
    pub fn end(&mut self, now_ms: u64) {
        let Some(mut finished) = self.current.take() else {
            return;
        };
        finished.ended_at_ms = Some(now_ms);
        info!(
            "history: session closed words={} progress={:.0}% wpm={}",
            finished.word_count, finished.progress, finished.wpm
        );

        self.sessions.push_front(finished);
        self.sessions.truncate(MAX_SESSIONS);
    }

    pub fn stats(&self) -> Option<HistoryStats> {
        if self.sessions.is_empty() {
            return None;
        }

        let count = self.sessions.len();
        let wpm_sum: f32 = self.sessions.iter().map(|s| s.wpm as f32).sum();
        let total_words = self
            .sessions
            .iter()
            .map(|s| (s.word_count as f32 * s.progress / 100.0).round() as usize)
            .sum();
        let total_time_ms = self
            .sessions
            .iter()
            .filter_map(|s| s.ended_at_ms.map(|end| end.saturating_sub(s.started_at_ms)))
            .sum();

        Some(HistoryStats {
            average_wpm: (wpm_sum / count as f32).round() as u16,
            total_words,
            total_time_ms,
            session_count: count,
        })
    }
}
