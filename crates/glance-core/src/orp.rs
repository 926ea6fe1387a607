//! Optimal Recognition Point placement for single-word presentation.

/// A word cut around its fixation letter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OrpSplit<'a> {
    pub before: &'a str,
    pub orp: &'a str,
    pub after: &'a str,
}

/// Fixation index for a word of `len` characters.
pub const fn orp_letter_index(len: usize) -> usize {
    match len {
        0 | 1 => 0,
        2..=5 => 1,
        6..=9 => 2,
        10..=13 => 3,
        _ => 4,
    }
}

/// Character index of the ORP letter inside `word`.
///
/// Lengths are counted in `char`s so multi-byte letters weigh the same as
/// ASCII ones. The result is always a valid char offset, or `0` for words
/// shorter than two characters.
pub fn calculate_orp(word: &str) -> usize {
    orp_letter_index(word.chars().count())
}

/// Splits `word` into the text before the ORP letter, the letter itself and
/// the remainder.
pub fn split_at_orp(word: &str) -> OrpSplit<'_> {
    let index = calculate_orp(word);
    let mut chars = word.char_indices().skip(index);

    let Some((start, ch)) = chars.next() else {
        return OrpSplit {
            before: word,
            orp: "",
            after: "",
        };
    };

    let end = start + ch.len_utf8();
    OrpSplit {
        before: &word[..start],
        orp: &word[start..end],
        after: &word[end..],
    }
}
