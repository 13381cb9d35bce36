use crate::core::table::{CodeTable, marker_letter};
use crate::transcode::tagged::{Tag, TaggedCell, TaggedText, Token};
use std::collections::HashMap;

/// Legacy text -> tagged Unicode, compiled from one code table.
///
/// Marker entries (single `A`-`Z` keys) are resolved before content entries.
/// Content entries are matched longest-key-first in a single left-to-right
/// pass, so text produced by one entry is never rewritten by another.
///
/// The rules borrow the table and never modify it; one table can back any
/// number of concurrent transcoders.
#[derive(Debug)]
pub struct ForwardTranscoder<'t> {
    markers: HashMap<char, Vec<Token>>,
    content: HashMap<&'t str, Vec<Token>>,
    longest_key: usize,
}

impl<'t> ForwardTranscoder<'t> {
    pub fn new(table: &'t CodeTable) -> Self {
        let mut markers = HashMap::new();
        let mut content = HashMap::new();
        let mut longest_key = 0;

        for (key, value) in table.characters() {
            if let Some(letter) = marker_letter(key) {
                markers.insert(letter, TaggedText::parse(value).tokens().to_vec());
            }
        }

        for (key, value) in table.characters() {
            if marker_letter(key).is_some() {
                continue;
            }
            // Marker letters are consumed first, so these keys can never match.
            if key.chars().any(|c| markers.contains_key(&c)) {
                log::debug!(
                    "table '{}': entry {:?} is shadowed by a virtual-dot marker",
                    table.name(),
                    key
                );
                continue;
            }

            longest_key = longest_key.max(key.chars().count());
            content.insert(key.as_str(), content_tokens(value));
        }

        ForwardTranscoder {
            markers,
            content,
            longest_key,
        }
    }

    pub fn transcode(&self, text: &str) -> TaggedText {
        let chars: Vec<char> = text.chars().collect();
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_count = chars.len();

        let mut output = TaggedText::with_capacity(char_count);
        let mut position = 0;

        'outer: while position < char_count {
            let start = bounds[position];
            let current = chars[position];

            if let Some(tokens) = self.markers.get(&current) {
                output.extend_from_slice(tokens);
                position += 1;
                continue;
            }

            let max_len = self.longest_key.min(char_count - position);
            for len in (1..=max_len).rev() {
                let candidate = &text[start..bounds[position + len]];
                if let Some(tokens) = self.content.get(candidate) {
                    output.extend_from_slice(tokens);
                    position += len;
                    continue 'outer;
                }
            }

            output.push(Token::Text(current));
            position += 1;
        }

        output
    }
}

/// Tokens for a content value. A value that is exactly one untagged 6-dot
/// cell gets the base tag so the reverse side can tell it from a marker-tagged
/// cell; anything else is taken verbatim.
fn content_tokens(value: &str) -> Vec<Token> {
    let parsed = TaggedText::parse(value);
    match parsed.tokens() {
        [Token::Cell(cell)] if cell.tag.is_none() && !cell.cell.is_eight_dot() => {
            vec![Token::Cell(TaggedCell::tagged(cell.cell, Tag::Base))]
        }
        tokens => tokens.to_vec(),
    }
}

/// Maps legacy-encoded `text` through `table` into tagged Unicode.
pub fn to_unicode(table: &CodeTable, text: &str) -> TaggedText {
    ForwardTranscoder::new(table).transcode(text)
}
