//! Rate to interval conversion and the shared live-rate cell.

use std::{cell::Cell, rc::Rc};

use crate::text::WordUnit;

/// Interval used when the rate is not positive.
pub const FALLBACK_INTERVAL_MS: f32 = 300.0;

const MS_PER_MINUTE: f32 = 60_000.0;

pub fn base_interval_ms(rate_wpm: u16) -> f32 {
    if rate_wpm == 0 {
        return FALLBACK_INTERVAL_MS;
    }
    MS_PER_MINUTE / rate_wpm as f32
}

pub fn word_interval_ms(base_interval_ms: f32, pace_weight: f32) -> f32 {
    base_interval_ms * pace_weight
}

/// Dwell time for a window of `group_size` words.
///
/// Uses the mean weight of `window`, so the overall rate does not depend on
/// the group size. A single-word group reduces to [`word_interval_ms`].
pub fn group_interval_ms(base_interval_ms: f32, group_size: usize, window: &[WordUnit]) -> f32 {
    let average = if window.is_empty() {
        1.0
    } else {
        window.iter().map(WordUnit::pace_weight).sum::<f32>() / window.len() as f32
    };
    base_interval_ms * group_size as f32 * average
}

/// Whole seconds left for `remaining_words` at `rate_wpm`, rounded up.
pub fn estimated_time_left(remaining_words: usize, rate_wpm: u16) -> u32 {
    let ms = remaining_words as f32 * base_interval_ms(rate_wpm);
    (ms / 1_000.0).ceil() as u32
}

/// `Ns` under a minute, `Mm Ss` otherwise.
pub fn format_time_left(seconds: u32) -> String {
    if seconds < 60 {
        format!("{seconds}s")
    } else {
        format!("{}m {}s", seconds / 60, seconds % 60)
    }
}

/// Rate read by the engine at tick time.
///
/// Cloning shares the cell: the ramp and the session write, the engine reads
/// whatever was written last, within the same frame. Everything runs on the
/// frame thread, so a plain `Cell` is enough.
#[derive(Clone, Debug, Default)]
pub struct LiveRate(Rc<Cell<u16>>);

impl LiveRate {
    pub fn new(rate_wpm: u16) -> Self {
        Self(Rc::new(Cell::new(rate_wpm)))
    }

    pub fn get(&self) -> u16 {
        self.0.get()
    }

    pub fn set(&self, rate_wpm: u16) {
        self.0.set(rate_wpm);
    }
}
