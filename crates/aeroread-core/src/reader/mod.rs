//! Reading session: one text (or book of chapters) driven frame by frame.
//!
//! Each frame runs input dispatch, then the ramp, then the engine, so the
//! engine always sees the rate emitted for the frame it is timing. Progress
//! and rate then fan out to history and notices.

use core::{cell::Cell, fmt};
use std::rc::Rc;

use log::{debug, info, warn};

use crate::{
    engine::{PlaybackEngine, TickResult as EngineTick},
    error::SessionError,
    input::{InputProvider, KeyCommand},
    pacing::{self, LiveRate},
    ramp::{RampEvent, RateRamp},
    render::{ReaderView, WordDisplay, WordParts},
    session::{
        bookmark::{Bookmark, BookmarkStore, text_fingerprint},
        chapters::{Chapter, ChapterSource, ChapterStream},
        history::ReadingHistory,
        notices::{NoticeId, Notices},
    },
    settings::{PersistedSettings, ReaderConfig},
    text::reconstruct,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FrameResult {
    NoRender,
    RenderRequested,
}

pub struct ReaderSession<C, B, IN>
where
    C: ChapterSource,
    B: BookmarkStore,
    IN: InputProvider,
{
    config: ReaderConfig,
    rate: LiveRate,
    engine: PlaybackEngine,
    ramp: RateRamp,
    chapters: ChapterStream<C>,
    bookmarks: B,
    input: IN,
    fingerprint: String,
    saved_bookmark: Option<Bookmark>,
    history: ReadingHistory,
    notices: Notices,
    // Set by the engine's completion handlers, consumed after its tick.
    chapter_ended: Rc<Cell<bool>>,
    book_ended: Rc<Cell<bool>>,
    // The next chapter failed to load; the next play retries it.
    retry_chapter: bool,
    book_complete: bool,
    exit_requested: bool,
    pending_redraw: bool,
}

impl<C, B, IN> fmt::Debug for ReaderSession<C, B, IN>
where
    C: ChapterSource,
    B: BookmarkStore,
    IN: InputProvider,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderSession")
            .field("config", &self.config)
            .field("engine", &self.engine)
            .field("ramp", &self.ramp)
            .field("chapter", &self.chapters.current_index())
            .field("fingerprint", &self.fingerprint)
            .field("exit_requested", &self.exit_requested)
            .finish_non_exhaustive()
    }
}

include!("view.rs");
include!("input.rs");
include!("runtime.rs");
