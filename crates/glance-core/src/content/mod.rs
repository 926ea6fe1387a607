//! Content model consumed by the playback engine.

mod default_text;
mod tokenize;

use alloc::{string::String, vec::Vec};

use log::warn;

pub use default_text::DEFAULT_TEXT;

/// Kind of non-word block shown with a fixed dwell time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SpecialKind {
    Image,
    Code,
    Table,
}

/// Pre-rendered block produced by the article extraction pipeline.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SpecialContent {
    pub kind: SpecialKind,
    /// Opaque markup or image reference, rendered by the presentation layer.
    pub payload: String,
    pub label: String,
}

impl SpecialContent {
    pub fn new(kind: SpecialKind, payload: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind,
            payload: payload.into(),
            label: label.into(),
        }
    }
}

/// One unit of the presentation sequence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ContentItem {
    Word(String),
    ParagraphBreak,
    Special(SpecialContent),
}

impl ContentItem {
    pub fn word(value: impl Into<String>) -> Self {
        Self::Word(value.into())
    }

    /// Words and specials occupy a slot in the presentation; breaks do not.
    pub const fn is_displayable(&self) -> bool {
        match self {
            Self::Word(_) | Self::Special(_) => true,
            Self::ParagraphBreak => false,
        }
    }
}

/// Immutable content sequence plus the indices derived from it.
///
/// Never empty: every constructor falls back to [`DEFAULT_TEXT`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sequence {
    items: Vec<ContentItem>,
    /// Word indices (not item indices) that open a sentence. Starts with `0`.
    sentence_starts: Vec<usize>,
    /// Item indices directly preceding a paragraph break.
    paragraph_ends: Vec<usize>,
    word_items: Vec<usize>,
    special_items: Vec<usize>,
    displayable_items: Vec<usize>,
}

impl Default for Sequence {
    fn default() -> Self {
        Self::build(tokenize::tokenize_text(DEFAULT_TEXT))
    }
}

impl Sequence {
    /// Tokenizes plain prose. Text without any word falls back to the
    /// default text.
    pub fn from_text(text: &str) -> Self {
        let items = tokenize::tokenize_text(text);
        if items.is_empty() {
            warn!("content: text holds no words, using default text");
            return Self::default();
        }
        Self::build(items)
    }

    /// Adopts items produced upstream. Break placement is trusted as-is; an
    /// empty list falls back to the default text.
    pub fn from_items(items: Vec<ContentItem>) -> Self {
        if items.is_empty() {
            warn!("content: empty item list, using default text");
            return Self::default();
        }
        Self::build(items)
    }

    fn build(items: Vec<ContentItem>) -> Self {
        let mut word_items = Vec::new();
        let mut special_items = Vec::new();
        let mut displayable_items = Vec::new();
        let mut paragraph_ends = Vec::new();

        for (index, item) in items.iter().enumerate() {
            match item {
                ContentItem::Word(_) => {
                    word_items.push(index);
                    displayable_items.push(index);
                }
                ContentItem::Special(_) => {
                    special_items.push(index);
                    displayable_items.push(index);
                }
                ContentItem::ParagraphBreak => {
                    if index > 0 {
                        paragraph_ends.push(index - 1);
                    }
                }
            }
        }

        let mut sentence_starts = Vec::with_capacity(word_items.len() / 8 + 1);
        sentence_starts.push(0);
        let last_word = word_items.len().saturating_sub(1);
        for (word_index, &item_index) in word_items.iter().enumerate() {
            if word_index == last_word {
                break;
            }
            if let ContentItem::Word(value) = &items[item_index]
                && tokenize::ends_sentence(value)
            {
                sentence_starts.push(word_index + 1);
            }
        }

        Self {
            items,
            sentence_starts,
            paragraph_ends,
            word_items,
            special_items,
            displayable_items,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.items.len().saturating_sub(1)
    }

    pub fn get(&self, index: usize) -> Option<&ContentItem> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn sentence_starts(&self) -> &[usize] {
        &self.sentence_starts
    }

    pub fn paragraph_ends(&self) -> &[usize] {
        &self.paragraph_ends
    }

    pub fn is_paragraph_end(&self, index: usize) -> bool {
        self.paragraph_ends.binary_search(&index).is_ok()
    }

    pub fn word_count(&self) -> usize {
        self.word_items.len()
    }

    pub fn special_count(&self) -> usize {
        self.special_items.len()
    }

    pub fn displayable_count(&self) -> usize {
        self.displayable_items.len()
    }

    /// Item indices of every special block, ascending.
    pub fn special_indices(&self) -> &[usize] {
        &self.special_items
    }

    /// Item indices of every word or special, ascending.
    pub fn displayable_indices(&self) -> &[usize] {
        &self.displayable_items
    }

    /// Number of words strictly before `item_index`.
    pub fn words_before(&self, item_index: usize) -> usize {
        self.word_items.partition_point(|&idx| idx < item_index)
    }

    /// Number of displayable items strictly before `item_index`.
    pub fn displayables_before(&self, item_index: usize) -> usize {
        self.displayable_items.partition_point(|&idx| idx < item_index)
    }

    /// Number of specials strictly after `item_index`.
    pub fn specials_after(&self, item_index: usize) -> usize {
        let at_or_before = self.special_items.partition_point(|&idx| idx <= item_index);
        self.special_items.len() - at_or_before
    }

    /// Item index of the `word_index`-th word.
    pub fn item_index_of_word(&self, word_index: usize) -> Option<usize> {
        self.word_items.get(word_index).copied()
    }

    /// Nearest special strictly after `from` and at or before `to`.
    pub fn first_special_in(&self, from: usize, to: usize) -> Option<usize> {
        let start = self.special_items.partition_point(|&idx| idx <= from);
        self.special_items.get(start).copied().filter(|&idx| idx <= to)
    }

    /// Nearest special at or after `to` and strictly before `from`.
    pub fn last_special_in(&self, to: usize, from: usize) -> Option<usize> {
        let end = self.special_items.partition_point(|&idx| idx < from);
        end.checked_sub(1)
            .map(|pos| self.special_items[pos])
            .filter(|&idx| idx >= to)
    }
}
