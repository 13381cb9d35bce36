use crate::core::cell::BrailleCell;
use crate::transcode::tagged::{TaggedText, Token};

/// Whether dots 7 and 8 must go: unless the source legitimately uses 8 dots
/// and the caller did not force 6-dot output.
pub fn should_strip(source_is_8dot: bool, force_6dot: bool) -> bool {
    !source_is_8dot || force_6dot
}

fn normalize_char(c: char, strip: bool) -> char {
    match BrailleCell::from_char(c) {
        Some(cell) if cell.is_blank() => ' ',
        Some(cell) if strip => cell.six_dot().to_char(),
        _ => c,
    }
}

/// Turns tagged Unicode into clean user-facing Unicode.
///
/// Blank cells become spaces, every tag is dropped, and dots 7/8 are lowered
/// according to [`should_strip`].
pub fn clear_unicode(tagged: &TaggedText, source_is_8dot: bool, force_6dot: bool) -> String {
    let strip = should_strip(source_is_8dot, force_6dot);
    let mut output = String::with_capacity(tagged.len() * 3);

    for token in tagged.tokens() {
        let c = match token {
            Token::Cell(cell) => cell.cell.to_char(),
            Token::Text(c) => *c,
        };
        output.push(normalize_char(c, strip));
    }

    output
}

/// Cleans Unicode braille that never went through a table: blank cells become
/// spaces and, if `force_6dot` is set, dots 7/8 are lowered.
pub fn clean_unicode_text(text: &str, force_6dot: bool) -> String {
    text.chars().map(|c| normalize_char(c, force_6dot)).collect()
}
