//! Chapter source for the terminal host: one text file per chapter.

use std::{fs, path::PathBuf};

use aeroread_core::{error::ChapterError, session::chapters::ChapterSource};
use log::debug;

pub(super) const SAMPLE_TEXT: &str = "Rapid serial visual presentation shows one word at a \
time in a fixed spot, so your eyes never have to travel across the line. Each word is \
aligned on its optimal recognition point, highlighted in red. Longer words, numbers like \
1984, and the ends of sentences stay on screen a little longer. Press space to start, the \
arrow keys to change speed, and w for a gentle warmup.";

#[derive(Debug, Clone)]
enum Entry {
    File(PathBuf),
    Inline(&'static str),
}

#[derive(Debug, Clone)]
pub(super) struct BookChapters {
    entries: Vec<Entry>,
}

impl BookChapters {
    pub(super) fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            entries: paths.into_iter().map(Entry::File).collect(),
        }
    }

    pub(super) fn sample() -> Self {
        Self {
            entries: vec![Entry::Inline(SAMPLE_TEXT)],
        }
    }
}

impl ChapterSource for BookChapters {
    fn chapter_count(&self) -> usize {
        self.entries.len()
    }

    fn load_chapter(&mut self, index: usize) -> Result<Option<String>, ChapterError> {
        let Some(entry) = self.entries.get(index) else {
            return Ok(None);
        };

        match entry {
            Entry::Inline(text) => Ok(Some((*text).to_owned())),
            Entry::File(path) => {
                debug!("chapters: reading {}", path.display());
                fs::read_to_string(path)
                    .map(Some)
                    .map_err(|err| ChapterError::Unreadable {
                        index,
                        reason: format!("{}: {}", path.display(), err),
                    })
            }
        }
    }
}
