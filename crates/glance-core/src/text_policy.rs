//! Bounded text shaping for labels shown next to the presented word.

use core::str;

use crate::engine::Progress;

pub const LABEL_MAX_WORDS: usize = 6;
pub const LABEL_MAX_CHARS: usize = 32;

/// Short form of a special block label for status lines.
pub fn label_preview<'a>(source: &str, out: &'a mut [u8]) -> &'a str {
    preview_limited(source, out, LABEL_MAX_WORDS, LABEL_MAX_CHARS)
}

/// Copies at most `max_words` words and `max_chars` characters of `source`
/// into `out`, collapsing whitespace and appending `...` when cut short.
pub fn preview_limited<'a>(
    source: &str,
    out: &'a mut [u8],
    max_words: usize,
    max_chars: usize,
) -> &'a str {
    let mut writer = BoundedWriter::new(out);
    let mut chars = 0usize;
    let mut truncated = false;

    'words: for (index, word) in source.split_whitespace().enumerate() {
        if index >= max_words {
            truncated = true;
            break;
        }

        if index > 0 {
            if chars >= max_chars || !writer.push(' ') {
                truncated = true;
                break;
            }
            chars += 1;
        }

        for ch in word.chars() {
            if chars >= max_chars || !writer.push(ch) {
                truncated = true;
                break 'words;
            }
            chars += 1;
        }
    }

    if truncated && !writer.is_empty() {
        let _ = writer.push_str("...");
    }

    writer.finish()
}

/// `"current/total pct%"`, e.g. `"5/12 41%"`.
pub fn progress_label(progress: Progress, out: &mut [u8]) -> &str {
    let mut writer = BoundedWriter::new(out);
    let _ = writer.push_number(progress.current as u64)
        && writer.push('/')
        && writer.push_number(progress.total as u64)
        && writer.push(' ')
        && writer.push_number(progress.percent as u64)
        && writer.push('%');
    writer.finish()
}

/// Appends whole characters to a byte buffer, refusing partial writes.
struct BoundedWriter<'a> {
    out: &'a mut [u8],
    len: usize,
}

impl<'a> BoundedWriter<'a> {
    fn new(out: &'a mut [u8]) -> Self {
        Self { out, len: 0 }
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn push(&mut self, ch: char) -> bool {
        let mut utf8 = [0u8; 4];
        let encoded = ch.encode_utf8(&mut utf8).as_bytes();
        if self.len + encoded.len() > self.out.len() {
            return false;
        }
        self.out[self.len..self.len + encoded.len()].copy_from_slice(encoded);
        self.len += encoded.len();
        true
    }

    fn push_str(&mut self, text: &str) -> bool {
        if self.len + text.len() > self.out.len() {
            return false;
        }
        text.chars().all(|ch| self.push(ch))
    }

    fn push_number(&mut self, mut value: u64) -> bool {
        let mut digits = [0u8; 20];
        let mut n = 0usize;
        loop {
            digits[n] = b'0' + (value % 10) as u8;
            value /= 10;
            n += 1;
            if value == 0 {
                break;
            }
        }
        digits[..n].iter().rev().all(|&d| self.push(d as char))
    }

    fn finish(self) -> &'a str {
        let len = self.len;
        let out: &'a [u8] = self.out;
        str::from_utf8(&out[..len]).unwrap_or("")
    }
}
