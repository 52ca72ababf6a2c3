//! Chapter-by-chapter content streaming.

use log::{debug, warn};

use crate::{
    error::ChapterError,
    text::{WordUnit, segment},
};

/// Supplier of plain chapter text. Extraction from EPUB/PDF happens before
/// this seam.
pub trait ChapterSource {
    fn chapter_count(&self) -> usize;

    /// Text of chapter `index`, or `None` past the end.
    fn load_chapter(&mut self, index: usize) -> Result<Option<String>, ChapterError>;
}

/// A whole text presented as a single chapter.
#[derive(Clone, Debug)]
pub struct SingleText {
    text: String,
}

impl SingleText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl ChapterSource for SingleText {
    fn chapter_count(&self) -> usize {
        1
    }

    fn load_chapter(&mut self, index: usize) -> Result<Option<String>, ChapterError> {
        Ok((index == 0).then(|| self.text.clone()))
    }
}

/// A loaded chapter, already segmented.
#[derive(Clone, Debug)]
pub struct Chapter {
    pub index: usize,
    pub text: String,
    pub words: Vec<WordUnit>,
}

#[derive(Debug)]
pub struct ChapterStream<C> {
    source: C,
    current: usize,
}

impl<C: ChapterSource> ChapterStream<C> {
    pub fn new(source: C, start_chapter: usize) -> Self {
        Self {
            source,
            current: start_chapter,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn chapter_count(&self) -> usize {
        self.source.chapter_count()
    }

    pub fn has_next(&self) -> bool {
        self.current + 1 < self.source.chapter_count()
    }

    /// Load the chapter the stream is positioned on.
    pub fn open(&mut self) -> Result<Option<Chapter>, ChapterError> {
        let index = self.current;
        Ok(self.source.load_chapter(index)?.map(|text| {
            let words = segment(&text);
            Chapter { index, text, words }
        }))
    }

    /// Jump to chapter `index` and load it. The position only moves if the
    /// chapter loads and has words; a blank chapter reads as missing.
    pub fn open_at(&mut self, index: usize) -> Result<Option<Chapter>, ChapterError> {
        let previous = self.current;
        self.current = index;
        match self.open() {
            Ok(Some(chapter)) if !chapter.words.is_empty() => {
                debug!("chapters: jumped to chapter {}", index);
                Ok(Some(chapter))
            }
            Ok(_) => {
                self.current = previous;
                Ok(None)
            }
            Err(err) => {
                self.current = previous;
                Err(err)
            }
        }
    }

    /// Move to the next chapter with any words in it.
    ///
    /// On error the stream stays on the current chapter, so the caller can
    /// retry.
    pub fn advance(&mut self) -> Result<Option<Chapter>, ChapterError> {
        let mut index = self.current + 1;
        loop {
            let text = match self.source.load_chapter(index) {
                Ok(Some(text)) => text,
                Ok(None) => {
                    debug!("chapters: end of book after chapter {}", self.current);
                    return Ok(None);
                }
                Err(err) => {
                    warn!("chapters: failed to load chapter {}: {}", index, err);
                    return Err(err);
                }
            };

            let words = segment(&text);
            if words.is_empty() {
                debug!("chapters: skipping empty chapter {}", index);
                index += 1;
                continue;
            }

            self.current = index;
            debug!("chapters: opened chapter {} words={}", index, words.len());
            return Ok(Some(Chapter { index, text, words }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted {
        chapters: Vec<Result<&'static str, ChapterError>>,
    }

    impl ChapterSource for Scripted {
        fn chapter_count(&self) -> usize {
            self.chapters.len()
        }

        fn load_chapter(&mut self, index: usize) -> Result<Option<String>, ChapterError> {
            match self.chapters.get(index) {
                Some(Ok(text)) => Ok(Some((*text).to_owned())),
                Some(Err(err)) => Err(err.clone()),
                None => Ok(None),
            }
        }
    }

    #[test]
    fn single_text_has_one_chapter() {
        let mut stream = ChapterStream::new(SingleText::new("one two"), 0);
        assert!(!stream.has_next());
        assert_eq!(stream.open().unwrap().unwrap().words.len(), 2);
        assert!(stream.advance().unwrap().is_none());
    }

    #[test]
    fn advance_skips_blank_chapters() {
        let mut stream = ChapterStream::new(
            Scripted {
                chapters: vec![Ok("first"), Ok("   "), Ok("third chapter")],
            },
            0,
        );
        assert!(stream.has_next());

        let next = stream.advance().unwrap().unwrap();
        assert_eq!(next.index, 2);
        assert_eq!(next.words.len(), 2);
        assert_eq!(stream.current_index(), 2);
        assert!(!stream.has_next());
    }

    #[test]
    fn open_at_only_moves_on_success() {
        let mut stream = ChapterStream::new(
            Scripted {
                chapters: vec![Ok("first"), Ok("second one"), Err(ChapterError::Unavailable)],
            },
            0,
        );
        assert_eq!(stream.open_at(1).unwrap().unwrap().words.len(), 2);
        assert_eq!(stream.current_index(), 1);

        assert!(stream.open_at(2).is_err());
        assert!(stream.open_at(7).unwrap().is_none());
        assert_eq!(stream.current_index(), 1);
    }

    #[test]
    fn open_at_treats_blank_chapters_as_missing() {
        let mut stream = ChapterStream::new(
            Scripted {
                chapters: vec![Ok("first"), Ok(" \n\t ")],
            },
            0,
        );
        assert!(stream.open_at(1).unwrap().is_none());
        assert_eq!(stream.current_index(), 0);
    }

    #[test]
    fn failed_load_keeps_position() {
        let mut stream = ChapterStream::new(
            Scripted {
                chapters: vec![Ok("first"), Err(ChapterError::Unavailable)],
            },
            0,
        );
        assert_eq!(stream.advance().unwrap_err(), ChapterError::Unavailable);
        assert_eq!(stream.current_index(), 0);
    }
}
