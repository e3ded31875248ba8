//! Length-preserving case folding and character-measured context windows.
//!
//! All mention offsets are byte offsets into the original document. Folding
//! never changes the UTF-8 width of a character, so an offset found in the
//! folded text is a valid slice boundary in the original.

/// Lowercase `text` one character at a time, keeping each character's byte width.
///
/// Characters whose lowercase form has a different width (or expands to several
/// characters) are left untouched.
pub fn fold_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let mut lower = ch.to_lowercase();
        match (lower.next(), lower.next()) {
            (Some(l), None) if l.len_utf8() == ch.len_utf8() => out.push(l),
            _ => out.push(ch),
        }
    }
    out
}

/// Byte index `chars` characters before `pos`, clamped at the start of `text`.
pub fn step_back(text: &str, pos: usize, chars: usize) -> usize {
    if chars == 0 {
        return pos;
    }
    text[..pos]
        .char_indices()
        .rev()
        .take(chars)
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(pos)
}

/// Byte index `chars` characters after `pos`, clamped at the end of `text`.
pub fn step_forward(text: &str, pos: usize, chars: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(chars)
        .map(|(idx, _)| pos + idx)
        .unwrap_or(text.len())
}

/// Folded slice spanning `before` characters ahead of `start` to `after` characters past `end`.
pub fn window(text: &str, start: usize, end: usize, before: usize, after: usize) -> String {
    let lo = step_back(text, start, before);
    let hi = step_forward(text, end, after);
    fold_case(&text[lo..hi])
}

/// Folded slice of the `before` characters immediately preceding `start`.
pub fn preceding(text: &str, start: usize, before: usize) -> String {
    let lo = step_back(text, start, before);
    fold_case(&text[lo..start])
}

/// Translates byte offsets of one document into character offsets.
///
/// Built once per document; each lookup is a binary search over the byte
/// position of every character.
#[derive(Debug, Clone)]
pub struct CharOffsets {
    starts: Vec<usize>,
}

impl CharOffsets {
    pub fn new(text: &str) -> Self {
        Self {
            starts: text.char_indices().map(|(idx, _)| idx).collect(),
        }
    }

    /// Number of characters before byte offset `byte`.
    pub fn char_offset(&self, byte: usize) -> usize {
        self.starts.partition_point(|&start| start < byte)
    }
}
