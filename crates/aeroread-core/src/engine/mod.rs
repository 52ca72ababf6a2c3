//! Frame-driven playback engine.
//!
//! The host calls [`PlaybackEngine::tick`] once per frame with a monotonic
//! timestamp. Elapsed time is banked until it covers the interval of the
//! current word or group, then the position advances. Waiting is pure
//! bookkeeping; nothing here blocks.
//!
//! At most one frame request is outstanding. Starting a loop replaces it,
//! stopping drops it, and a frame delivered against a replaced or dropped
//! request is ignored, so a leaked host callback cannot advance the reader.

use core::fmt;

use log::debug;

use crate::{
    error::ConfigError,
    pacing::{self, LiveRate},
    text::WordUnit,
};

/// Backward jump applied on pause, for the eye running ahead of the display.
pub const RECOIL_WORDS: usize = 5;
pub const DEFAULT_REWIND_WORDS: usize = 10;

/// Words advanced and displayed per step.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum GroupSize {
    #[default]
    One,
    Two,
    Three,
}

impl GroupSize {
    pub const fn get(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

impl TryFrom<u8> for GroupSize {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(ConfigError::InvalidGroupSize(other)),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlaybackPhase {
    Idle,
    Running,
    Finished,
}

/// Which completion handler fired when the end of the sequence was reached.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Completion {
    ChapterBoundary,
    SequenceComplete,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    /// No frame was pending, or the frame belonged to a cancelled loop.
    Ignored,
    /// Time banked; the next frame has been requested.
    Waiting,
    Advanced,
    Finished(Completion),
}

/// Handle for one requested frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FrameId(u32);

/// Window of up to three words starting at the current position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkView<'a> {
    words: &'a [WordUnit],
}

impl<'a> ChunkView<'a> {
    pub fn words(&self) -> &'a [WordUnit] {
        self.words
    }

    pub fn display_text(&self) -> String {
        let mut out = String::new();
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(word.text());
        }
        out
    }

    pub fn is_grouped(&self) -> bool {
        self.words.len() > 1
    }
}

type Handler = Box<dyn FnMut()>;

pub struct PlaybackEngine {
    words: Vec<WordUnit>,
    position: usize,
    playing: bool,
    finished: bool,
    group_size: GroupSize,
    accumulated_ms: f32,
    last_frame_ms: Option<u64>,
    pending_frame: Option<FrameId>,
    frame_seq: u32,
    rate: LiveRate,
    on_complete: Option<Handler>,
    on_chapter_complete: Option<Handler>,
}

impl fmt::Debug for PlaybackEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackEngine")
            .field("len", &self.words.len())
            .field("position", &self.position)
            .field("playing", &self.playing)
            .field("finished", &self.finished)
            .field("group_size", &self.group_size)
            .field("accumulated_ms", &self.accumulated_ms)
            .field("pending_frame", &self.pending_frame)
            .field("rate", &self.rate.get())
            .finish_non_exhaustive()
    }
}

impl PlaybackEngine {
    pub fn new(words: Vec<WordUnit>, start_index: usize, rate: LiveRate) -> Self {
        let mut engine = Self {
            words: Vec::new(),
            position: 0,
            playing: false,
            finished: false,
            group_size: GroupSize::One,
            accumulated_ms: 0.0,
            last_frame_ms: None,
            pending_frame: None,
            frame_seq: 0,
            rate,
            on_complete: None,
            on_chapter_complete: None,
        };
        engine.load_words(words, start_index);
        engine
    }

    /// Swap in a new sequence, e.g. the next chapter.
    ///
    /// The position is re-clamped against the new length and the next frame
    /// is treated as the first, so time spent loading is not charged to the
    /// new words. A running loop is restarted; an empty sequence stops it.
    pub fn load_words(&mut self, words: Vec<WordUnit>, start_index: usize) {
        self.words = words;
        self.position = self.clamp_index(start_index);
        self.accumulated_ms = 0.0;
        self.finished = false;

        if self.words.is_empty() {
            self.stop_loop();
        } else if self.playing {
            self.start_loop();
        } else {
            self.last_frame_ms = None;
        }

        debug!(
            "engine: loaded words={} position={} playing={}",
            self.words.len(),
            self.position,
            self.playing
        );
    }

    pub fn words(&self) -> &[WordUnit] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn phase(&self) -> PlaybackPhase {
        if self.playing {
            PlaybackPhase::Running
        } else if self.finished {
            PlaybackPhase::Finished
        } else {
            PlaybackPhase::Idle
        }
    }

    pub fn group_size(&self) -> GroupSize {
        self.group_size
    }

    pub fn accumulated_ms(&self) -> f32 {
        self.accumulated_ms
    }

    /// Handle to the rate cell read on every tick.
    pub fn rate_input(&self) -> LiveRate {
        self.rate.clone()
    }

    pub fn pending_frame(&self) -> Option<FrameId> {
        self.pending_frame
    }

    /// Percentage through the sequence, `0` when empty.
    pub fn progress(&self) -> f32 {
        if self.words.is_empty() {
            return 0.0;
        }
        self.position as f32 / self.words.len() as f32 * 100.0
    }

    pub fn current_word(&self) -> Option<&WordUnit> {
        self.words.get(self.position)
    }

    pub fn current_chunk(&self) -> Option<ChunkView<'_>> {
        if self.words.is_empty() {
            return None;
        }

        Some(ChunkView {
            words: self.window(),
        })
    }

    pub fn set_on_complete(&mut self, handler: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(handler));
    }

    /// Register the chapter-boundary handler. It takes precedence over the
    /// plain completion handler.
    pub fn set_on_chapter_complete(&mut self, handler: impl FnMut() + 'static) {
        self.on_chapter_complete = Some(Box::new(handler));
    }

    pub fn clear_on_chapter_complete(&mut self) {
        self.on_chapter_complete = None;
    }

    pub fn set_group_size(&mut self, group_size: GroupSize) {
        if self.group_size == group_size {
            return;
        }
        self.group_size = group_size;
        if self.playing {
            self.start_loop();
        }
        debug!("engine: group size={}", group_size.get());
    }

    pub fn play(&mut self) {
        if self.words.is_empty() {
            debug!("engine: play ignored, no words loaded");
            return;
        }
        if self.playing {
            return;
        }

        if self.position >= self.words.len() - 1 {
            self.position = 0;
        }
        self.playing = true;
        self.finished = false;
        self.start_loop();
        debug!("engine: play position={}", self.position);
    }

    /// Stop and step back by [`RECOIL_WORDS`]. A no-op when already stopped.
    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }

        self.playing = false;
        self.stop_loop();
        self.accumulated_ms = 0.0;
        self.position = self.position.saturating_sub(RECOIL_WORDS);
        debug!("engine: pause position={}", self.position);
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn rewind(&mut self, words: usize) {
        self.position = self.position.saturating_sub(words);
        self.finished = false;
        debug!("engine: rewind by={} position={}", words, self.position);
    }

    pub fn reset(&mut self) {
        self.playing = false;
        self.finished = false;
        self.stop_loop();
        self.position = 0;
        self.accumulated_ms = 0.0;
        debug!("engine: reset");
    }

    pub fn seek(&mut self, index: usize) {
        self.position = self.clamp_index(index);
        self.finished = false;
        debug!("engine: seek position={}", self.position);
    }

    /// Run the pending frame, if any.
    pub fn tick(&mut self, now_ms: u64) -> TickResult {
        match self.pending_frame {
            Some(frame) => self.on_frame(frame, now_ms),
            None => TickResult::Ignored,
        }
    }

    /// Deliver a frame. Frames from a replaced or cancelled loop are ignored.
    pub fn on_frame(&mut self, frame: FrameId, now_ms: u64) -> TickResult {
        if self.pending_frame != Some(frame) {
            return TickResult::Ignored;
        }
        self.pending_frame = None;

        if !self.playing || self.words.is_empty() {
            return TickResult::Ignored;
        }

        let elapsed = match self.last_frame_ms {
            Some(last) => now_ms.saturating_sub(last),
            None => 0,
        };
        self.last_frame_ms = Some(now_ms);
        self.accumulated_ms += elapsed as f32;

        if self.accumulated_ms < self.current_interval_ms() {
            self.request_frame();
            return TickResult::Waiting;
        }

        self.accumulated_ms = 0.0;
        let step = self.group_size.get();
        if self.position + step >= self.words.len() {
            return TickResult::Finished(self.finish());
        }

        self.position += step;
        self.request_frame();
        TickResult::Advanced
    }

    /// Interval for the word or group at the current position, at the rate
    /// currently in the live cell.
    pub fn current_interval_ms(&self) -> f32 {
        let base = pacing::base_interval_ms(self.rate.get());
        match self.group_size {
            GroupSize::One => {
                let weight = self.current_word().map_or(1.0, WordUnit::pace_weight);
                pacing::word_interval_ms(base, weight)
            }
            group => pacing::group_interval_ms(base, group.get(), self.window()),
        }
    }

    fn finish(&mut self) -> Completion {
        self.position = self.words.len() - 1;
        self.playing = false;
        self.finished = true;
        self.stop_loop();

        let completion = if let Some(handler) = self.on_chapter_complete.as_mut() {
            handler();
            Completion::ChapterBoundary
        } else {
            if let Some(handler) = self.on_complete.as_mut() {
                handler();
            }
            Completion::SequenceComplete
        };
        debug!(
            "engine: finished position={} completion={:?}",
            self.position, completion
        );
        completion
    }

    fn window(&self) -> &[WordUnit] {
        let start = self.position.min(self.words.len());
        let end = (start + self.group_size.get()).min(self.words.len());
        &self.words[start..end]
    }

    fn clamp_index(&self, index: usize) -> usize {
        index.min(self.words.len().saturating_sub(1))
    }

    // Replaces any outstanding request, so two loops never run at once.
    fn start_loop(&mut self) {
        self.last_frame_ms = None;
        self.request_frame();
    }

    fn stop_loop(&mut self) {
        self.pending_frame = None;
        self.last_frame_ms = None;
    }

    fn request_frame(&mut self) {
        self.frame_seq = self.frame_seq.wrapping_add(1);
        self.pending_frame = Some(FrameId(self.frame_seq));
    }
}

#[cfg(test)]
mod tests;
