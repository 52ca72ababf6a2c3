//! One-shot reader notices.
//!
//! The shown-set lives in each [`Notices`] value, so a new reading session
//! (or a new test) starts clean.

use heapless::{Deque, Vec as HeaplessVec};
use log::debug;

pub const SPEED_NOTICE_WPM: u16 = 800;
pub const MARATHON_MS: u64 = 10 * 60 * 1_000;

const NOTICE_KINDS: usize = 3;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NoticeId {
    Speed,
    Complete,
    Marathon,
}

impl NoticeId {
    pub fn message(self) -> &'static str {
        match self {
            Self::Speed => "Past 800 wpm. Keep your eyes on the pivot.",
            Self::Complete => "Text complete.",
            Self::Marathon => "Ten minutes of uninterrupted reading.",
        }
    }
}

#[derive(Debug, Default)]
pub struct Notices {
    shown: HeaplessVec<NoticeId, NOTICE_KINDS>,
    queue: Deque<NoticeId, NOTICE_KINDS>,
    current: Option<NoticeId>,
    playing_since_ms: Option<u64>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<NoticeId> {
        self.current
    }

    pub fn has_shown(&self, id: NoticeId) -> bool {
        self.shown.contains(&id)
    }

    /// Queue `id` unless it was already shown this session.
    pub fn raise(&mut self, id: NoticeId) -> bool {
        if self.has_shown(id) {
            return false;
        }

        let _ = self.shown.push(id);
        let _ = self.queue.push_back(id);
        debug!("notices: queued {:?}", id);
        self.promote();
        true
    }

    pub fn dismiss(&mut self) {
        self.current = None;
        self.promote();
    }

    /// Check the per-frame triggers.
    pub fn observe(&mut self, wpm: u16, progress: f32, playing: bool, now_ms: u64) {
        if wpm > SPEED_NOTICE_WPM {
            self.raise(NoticeId::Speed);
        }
        if progress >= 100.0 {
            self.raise(NoticeId::Complete);
        }

        if playing {
            let since = *self.playing_since_ms.get_or_insert(now_ms);
            if now_ms.saturating_sub(since) >= MARATHON_MS {
                self.raise(NoticeId::Marathon);
            }
        } else {
            self.playing_since_ms = None;
        }
    }

    fn promote(&mut self) {
        if self.current.is_none() {
            self.current = self.queue.pop_front();
        }
    }
}
