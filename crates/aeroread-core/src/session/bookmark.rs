//! Single-slot bookmark keyed by a fingerprint of the text.

use core::convert::Infallible;

const FINGERPRINT_UNITS: usize = 1_000;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bookmark {
    pub fingerprint: String,
    pub chapter: usize,
    /// Word index inside `chapter`.
    pub index: usize,
    pub saved_at_ms: u64,
}

/// Abstract bookmark persistence.
pub trait BookmarkStore {
    type Error;

    /// Bookmark for `fingerprint`, or `None` if the stored one belongs to
    /// another text.
    fn load(&mut self, fingerprint: &str) -> Result<Option<Bookmark>, Self::Error>;
    fn save(&mut self, bookmark: Bookmark) -> Result<(), Self::Error>;
    fn clear(&mut self) -> Result<(), Self::Error>;
}

/// In-memory store holding the most recent bookmark.
#[derive(Clone, Debug, Default)]
pub struct MemoryBookmarks {
    slot: Option<Bookmark>,
}

impl MemoryBookmarks {
    pub const fn new() -> Self {
        Self { slot: None }
    }

    pub fn with(slot: Option<Bookmark>) -> Self {
        Self { slot }
    }

    pub fn latest(&self) -> Option<&Bookmark> {
        self.slot.as_ref()
    }
}

impl BookmarkStore for MemoryBookmarks {
    type Error = Infallible;

    fn load(&mut self, fingerprint: &str) -> Result<Option<Bookmark>, Self::Error> {
        Ok(self
            .slot
            .as_ref()
            .filter(|bookmark| bookmark.fingerprint == fingerprint)
            .cloned())
    }

    fn save(&mut self, bookmark: Bookmark) -> Result<(), Self::Error> {
        self.slot = Some(bookmark);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.slot = None;
        Ok(())
    }
}

/// 32-bit rolling hash (`h * 31 + unit`) over the first 1000 UTF-16 code
/// units, written in signed base 36.
pub fn text_fingerprint(text: &str) -> String {
    let hash = text
        .encode_utf16()
        .take(FINGERPRINT_UNITS)
        .fold(0i32, |hash, unit| {
            hash.wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(unit as i32)
        });
    to_base36(hash)
}

fn to_base36(value: i32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut magnitude = value.unsigned_abs();
    if magnitude == 0 {
        return "0".to_owned();
    }

    let mut digits = Vec::new();
    while magnitude > 0 {
        digits.push(DIGITS[(magnitude % 36) as usize]);
        magnitude /= 36;
    }
    if value < 0 {
        digits.push(b'-');
    }
    digits.iter().rev().map(|&b| b as char).collect()
}
