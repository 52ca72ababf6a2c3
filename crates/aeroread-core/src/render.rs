//! View model handed to the display.

use crate::{
    engine::{GroupSize, PlaybackPhase},
    pacing,
    text::WordUnit,
};

/// A single word split around its pivot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WordParts<'a> {
    pub prefix: &'a str,
    pub pivot: &'a str,
    pub suffix: &'a str,
}

impl<'a> From<&'a WordUnit> for WordParts<'a> {
    fn from(word: &'a WordUnit) -> Self {
        Self {
            prefix: word.prefix(),
            pivot: word.pivot_char(),
            suffix: word.suffix(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WordDisplay<'a> {
    Empty,
    Word(WordParts<'a>),
    /// Grouped words are shown as plain text, without a pivot.
    Group(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReaderView<'a> {
    pub display: WordDisplay<'a>,
    /// Rate the engine is currently reading, ramp included.
    pub live_wpm: u16,
    pub target_wpm: u16,
    pub position: usize,
    pub total_words: usize,
    /// 0..=100
    pub progress: f32,
    pub seconds_left: u32,
    pub phase: PlaybackPhase,
    pub group_size: GroupSize,
    pub warmup_active: bool,
    pub chapter: usize,
    pub chapter_count: usize,
    pub notice: Option<&'static str>,
}

impl ReaderView<'_> {
    pub fn is_paused(&self) -> bool {
        self.phase != PlaybackPhase::Running
    }

    pub fn progress_pct(&self) -> u8 {
        self.progress.clamp(0.0, 100.0).round() as u8
    }

    pub fn time_left_label(&self) -> String {
        pacing::format_time_left(self.seconds_left)
    }
}
