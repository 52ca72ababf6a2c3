//! Word segmentation: whitespace tokens with ORP split and pacing weight.
//!
//! The pivot is chosen from the raw token length, punctuation included. An
//! older rule stripped punctuation before measuring; the length-inclusive
//! rule is the only one implemented here.

const SENTENCE_WEIGHT: f32 = 2.2;
const CLAUSE_WEIGHT: f32 = 1.5;
const QUOTE_WEIGHT: f32 = 1.2;
const SHORT_WEIGHT: f32 = 0.75;
const VERY_LONG_WEIGHT: f32 = 1.6;
const LONG_WEIGHT: f32 = 1.35;
const DIGIT_WEIGHT: f32 = 1.5;
const CAPS_WEIGHT: f32 = 1.2;

const SHORT_MAX_CHARS: usize = 2;
const LONG_MIN_CHARS: usize = 10;
const VERY_LONG_MIN_CHARS: usize = 15;

const SENTENCE_ENDINGS: [char; 3] = ['.', '!', '?'];
const CLAUSE_ENDINGS: [char; 4] = [',', ';', ':', '\u{2014}'];
const CLOSING_QUOTES: [char; 4] = ['"', '\'', '\u{201D}', '\u{2019}'];

/// One displayable token with its recognition point and dwell weight.
#[derive(Clone, Debug, PartialEq)]
pub struct WordUnit {
    text: String,
    pivot_index: usize,
    pivot_start: usize,
    pivot_end: usize,
    pace_weight: f32,
}

impl WordUnit {
    pub fn new(text: &str) -> Self {
        let pivot_index = pivot_index(text);
        let (pivot_start, pivot_end) = match text.char_indices().nth(pivot_index) {
            Some((start, ch)) => (start, start + ch.len_utf8()),
            None => (text.len(), text.len()),
        };

        Self {
            text: text.to_owned(),
            pivot_index,
            pivot_start,
            pivot_end,
            pace_weight: pace_weight(text),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Character offset of the recognition point.
    pub fn pivot_index(&self) -> usize {
        self.pivot_index
    }

    pub fn prefix(&self) -> &str {
        &self.text[..self.pivot_start]
    }

    /// Single character at the pivot, empty when the token is empty.
    pub fn pivot_char(&self) -> &str {
        &self.text[self.pivot_start..self.pivot_end]
    }

    pub fn suffix(&self) -> &str {
        &self.text[self.pivot_end..]
    }

    pub fn pace_weight(&self) -> f32 {
        self.pace_weight
    }
}

/// Split raw text on whitespace runs. Blank input yields an empty sequence.
pub fn segment(raw_text: &str) -> Vec<WordUnit> {
    raw_text.split_whitespace().map(WordUnit::new).collect()
}

/// Join token texts with single spaces.
pub fn reconstruct(words: &[WordUnit]) -> String {
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(word.text());
    }
    out
}

pub fn pivot_index(word: &str) -> usize {
    match word.chars().count() {
        0..=1 => 0,
        2..=4 => 1,
        5..=8 => 2,
        9..=12 => 3,
        _ => 4,
    }
}

/// Relative dwell time of `word`. Bonuses compound; no clamp is applied.
pub fn pace_weight(word: &str) -> f32 {
    let mut weight = 1.0f32;

    if ends_with_any(word, &SENTENCE_ENDINGS) {
        weight *= SENTENCE_WEIGHT;
    } else if ends_with_any(word, &CLAUSE_ENDINGS) {
        weight *= CLAUSE_WEIGHT;
    } else if ends_with_any(word, &CLOSING_QUOTES) {
        weight *= QUOTE_WEIGHT;
    }

    let cleaned = cleaned_len(word);
    if cleaned <= SHORT_MAX_CHARS {
        weight *= SHORT_WEIGHT;
    }
    if cleaned > VERY_LONG_MIN_CHARS {
        weight *= VERY_LONG_WEIGHT;
    } else if cleaned > LONG_MIN_CHARS {
        weight *= LONG_WEIGHT;
    }

    if word.chars().any(|ch| ch.is_ascii_digit()) {
        weight *= DIGIT_WEIGHT;
    }

    if cleaned > 1 && is_all_caps(word) {
        weight *= CAPS_WEIGHT;
    }

    weight
}

/// First `max_chars` characters of `text`, with `...` appended when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().nth(max_chars).is_some() {
        out.push_str("...");
    }
    out
}

fn ends_with_any(word: &str, endings: &[char]) -> bool {
    word.chars().next_back().is_some_and(|ch| endings.contains(&ch))
}

fn cleaned_len(word: &str) -> usize {
    word.chars().filter(|ch| ch.is_alphanumeric()).count()
}

// Needs at least one letter: "1999." is not shouting.
fn is_all_caps(word: &str) -> bool {
    word.chars().any(char::is_alphabetic) && !word.chars().any(char::is_lowercase)
}
