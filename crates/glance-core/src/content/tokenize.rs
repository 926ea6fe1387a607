use alloc::{string::String, vec::Vec};

use super::ContentItem;

/// Turns plain prose into words and paragraph breaks.
///
/// Paragraphs are separated by one or more blank lines; paragraphs that hold
/// no words are dropped so breaks never lead, trail or repeat.
pub(super) fn tokenize_text(text: &str) -> Vec<ContentItem> {
    let mut items = Vec::new();

    for paragraph in split_paragraphs(text) {
        let normalized = normalize_dashes(&paragraph);
        let mut words = normalized.split_whitespace().peekable();
        if words.peek().is_none() {
            continue;
        }

        if !items.is_empty() {
            items.push(ContentItem::ParagraphBreak);
        }
        items.extend(words.map(|word| ContentItem::Word(String::from(word))));
    }

    items
}

pub(super) fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.trim().is_empty() {
                paragraphs.push(core::mem::take(&mut current));
            }
            current.clear();
            continue;
        }

        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }

    if !current.trim().is_empty() {
        paragraphs.push(current);
    }

    paragraphs
}

/// Em and en dashes stay on the fragment before them; `--` becomes an em
/// dash and a lone `-` splits compounds.
pub(super) fn normalize_dashes(paragraph: &str) -> String {
    let mut out = String::with_capacity(paragraph.len() + 8);
    let mut chars = paragraph.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '-' if chars.peek() == Some(&'-') => {
                chars.next();
                out.push('—');
                out.push(' ');
            }
            '-' => out.push(' '),
            '—' | '–' => {
                out.push(ch);
                out.push(' ');
            }
            _ => out.push(ch),
        }
    }

    out
}

pub(super) fn ends_sentence(word: &str) -> bool {
    matches!(word.chars().last(), Some('.' | '!' | '?'))
}
