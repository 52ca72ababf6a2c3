//! Input abstraction layer.

mod scripted;

pub use scripted::ScriptedInput;

use crate::engine::GroupSize;

/// Logical commands consumed by the reader session.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeyCommand {
    TogglePlay,
    Rewind,
    Faster,
    Slower,
    SetGroup(GroupSize),
    ToggleWarmup,
    SaveBookmark,
    RestoreBookmark,
    DismissNotice,
    Reset,
    Exit,
}

/// Polled input provider.
pub trait InputProvider {
    type Error;

    fn poll_event(&mut self) -> Result<Option<KeyCommand>, Self::Error>;
}
