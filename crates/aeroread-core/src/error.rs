//! Errors raised at the configuration and collaborator boundaries.

use thiserror::Error;

/// Caller contract violations, rejected before they reach the frame loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum ConfigError {
    #[error("group size must be 1, 2 or 3 (got {0})")]
    InvalidGroupSize(u8),
    #[error("rate bounds are invalid (min {min}, max {max})")]
    InvalidRateBounds { min: u16, max: u16 },
    #[error("rate step must be positive")]
    ZeroRateStep,
}

/// Failure reported by a chapter source.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ChapterError {
    #[error("chapter {index} could not be read: {reason}")]
    Unreadable { index: usize, reason: String },
    #[error("chapter source is unavailable")]
    Unavailable,
}

/// Failure while opening a reading session.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Chapter(#[from] ChapterError),
}
