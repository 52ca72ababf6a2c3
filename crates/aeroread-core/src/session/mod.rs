//! Collaborators fed by the engine: bookmarks, history, chapters, notices.
//!
//! Storage formats and durability belong to the implementations; the core
//! only defines what flows across each seam.

pub mod bookmark;
pub mod chapters;
pub mod history;
pub mod notices;
