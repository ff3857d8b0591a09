use log::debug;
use serde::{Deserialize, Serialize};

/// Half-open byte range `[start, end)` of one match in the buffer.
pub type Span = (usize, usize);

/// A named highlight color. Rendering detail only; match logic never looks
/// at it (hosts overlay it with a fixed alpha).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightColor {
    pub name: String,
    pub rgb: (u8, u8, u8),
}

impl HighlightColor {
    pub fn new(name: &str, rgb: (u8, u8, u8)) -> Self {
        Self {
            name: name.to_string(),
            rgb,
        }
    }
}

/// The palette the original tool ships with.
pub fn default_palette() -> Vec<HighlightColor> {
    vec![
        HighlightColor::new("Yellow", (255, 255, 0)),
        HighlightColor::new("Green", (0, 255, 0)),
        HighlightColor::new("Red", (255, 0, 0)),
        HighlightColor::new("Cyan", (0, 255, 255)),
    ]
}

/// All occurrences of `word` in `text`, overlap-inclusive: after a hit the
/// scan resumes one character past the match start, not past its end, so
/// "aa" over "aaa" yields spans at 0 and 1.
pub fn scan_word(text: &str, word: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    if word.is_empty() {
        return spans;
    }

    let mut from = 0;
    while let Some(found) = text[from..].find(word) {
        let start = from + found;
        spans.push((start, start + word.len()));

        // Next char boundary after the match start
        from = start
            + text[start..]
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(1);
    }

    spans
}

/// Whole-buffer recompute: one scan per watched word, in word order, with
/// bookmarks parallel to spans. Bookmarks therefore group by word first and
/// only then run left to right.
pub fn compute_highlights(text: &str, words: &[String]) -> (Vec<Span>, Vec<usize>) {
    let mut spans = Vec::new();
    let mut bookmarks = Vec::new();

    for word in words {
        for span in scan_word(text, word) {
            bookmarks.push(span.0);
            spans.push(span);
        }
    }

    (spans, bookmarks)
}

/// First bookmark strictly past `current_offset`, walking the list in its
/// stored order and wrapping to the first stored entry when none qualifies.
pub fn goto_next(bookmarks: &[usize], current_offset: usize) -> Option<usize> {
    let first = *bookmarks.first()?;

    for &bookmark in bookmarks {
        if bookmark > current_offset {
            return Some(bookmark);
        }
    }

    Some(first)
}

/// Expand a byte offset to its enclosing line: start is just past the
/// previous newline (or 0), end is the next newline (or the buffer end).
pub fn line_bounds(text: &str, offset: usize) -> (usize, usize) {
    let bytes = text.as_bytes();
    let offset = offset.min(bytes.len());

    let start = bytes[..offset]
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0);

    let end = bytes[offset..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|i| offset + i)
        .unwrap_or(bytes.len());

    (start, end)
}

/// Watched words of one color over a live text buffer.
///
/// The host buffer calls `on_buffer_changed` on every edit; recompute is
/// whole-buffer, which is fine at interactive edit rates and nowhere else.
#[derive(Debug, Clone)]
pub struct Highlighter {
    color: HighlightColor,
    watched_words: Vec<String>,
    spans: Vec<Span>,
    bookmarks: Vec<usize>,
}

impl Highlighter {
    pub fn new(color: HighlightColor) -> Self {
        Self {
            color,
            watched_words: Vec::new(),
            spans: Vec::new(),
            bookmarks: Vec::new(),
        }
    }

    pub fn color(&self) -> &HighlightColor {
        &self.color
    }

    pub fn watched_words(&self) -> &[String] {
        &self.watched_words
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn bookmarks(&self) -> &[usize] {
        &self.bookmarks
    }

    /// Watch `word` and append its matches against the current text.
    /// Empty and already-watched words are no-ops; matches of earlier words
    /// stay where they are, nothing is resorted.
    pub fn add(&mut self, text: &str, word: &str) {
        if word.is_empty() || self.watched_words.iter().any(|w| w == word) {
            return;
        }

        self.watched_words.push(word.to_string());
        for span in scan_word(text, word) {
            self.bookmarks.push(span.0);
            self.spans.push(span);
        }
        debug!(
            "[{}] watching {:?}, {} span(s) total",
            self.color.name,
            word,
            self.spans.len()
        );
    }

    /// Forget every watched word and all of their matches.
    pub fn clear(&mut self) {
        self.watched_words.clear();
        self.spans.clear();
        self.bookmarks.clear();
    }

    /// Buffer-edit callback: drop all matches and rescan the new text for
    /// every watched word, in the order they were added.
    pub fn on_buffer_changed(&mut self, new_text: &str) {
        let (spans, bookmarks) = compute_highlights(new_text, &self.watched_words);
        self.spans = spans;
        self.bookmarks = bookmarks;
    }

    /// Cyclic "next match" over this set's bookmarks.
    pub fn goto_next(&self, current_offset: usize) -> Option<usize> {
        goto_next(&self.bookmarks, current_offset)
    }
}
