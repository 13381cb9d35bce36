use crate::core::cell::BrailleCell;
use crate::core::table::CodeTable;
use crate::transcode::tagged::{TaggedCell, TaggedText, Token};
use std::collections::HashMap;

/// What the reverse transcoder is fed.
#[derive(Debug, Clone, Copy)]
pub enum UnicodeInput<'a> {
    /// User-supplied Unicode braille (Unicode -> legacy)
    Clean(&'a str),
    /// Output of the forward transcoder (legacy -> legacy)
    Tagged(&'a TaggedText),
}

/// Cell string -> source symbol, built from a destination table.
///
/// Entries are visited with array-index keys ("0", "17", ...) first in
/// numeric order, then every other key in table order. When several symbols
/// share a cell string, the last one visited wins.
#[derive(Debug)]
pub struct ReverseIndex<'t> {
    symbols: HashMap<&'t str, &'t str>,
}

impl<'t> ReverseIndex<'t> {
    pub fn new(table: &'t CodeTable) -> Self {
        let mut indexed: Vec<(u32, &'t (String, String))> = Vec::new();
        let mut named: Vec<&'t (String, String)> = Vec::new();
        for entry in table.characters() {
            match array_index(&entry.0) {
                Some(index) => indexed.push((index, entry)),
                None => named.push(entry),
            }
        }
        indexed.sort_by_key(|(index, _)| *index);

        let mut symbols = HashMap::with_capacity(table.characters().len());
        let ordered = indexed.into_iter().map(|(_, entry)| entry).chain(named);
        for (key, value) in ordered {
            if let Some(previous) = symbols.insert(value.as_str(), key.as_str()) {
                log::debug!(
                    "table '{}': {:?} and {:?} share {:?}, keeping {:?}",
                    table.name(),
                    previous,
                    key,
                    value,
                    key
                );
            }
        }
        ReverseIndex { symbols }
    }

    fn lookup(&self, cells: &str) -> Option<&'t str> {
        self.symbols.get(cells).copied()
    }

    fn lookup_cell(&self, cell: BrailleCell) -> Option<&'t str> {
        let mut buf = [0u8; 4];
        self.lookup(cell.to_char().encode_utf8(&mut buf))
    }

    /// Clean mode: each braille cell maps directly, or through its 6-dot
    /// equivalent, or stays as it is.
    pub fn from_clean(&self, text: &str) -> String {
        let mut output = String::with_capacity(text.len());

        for c in text.chars() {
            match BrailleCell::from_char(c) {
                Some(cell) if cell.is_blank() => output.push(' '),
                Some(cell) => {
                    let symbol = self.lookup_cell(cell).or_else(|| {
                        if cell.is_eight_dot() {
                            self.lookup_cell(cell.six_dot())
                        } else {
                            None
                        }
                    });
                    match symbol {
                        Some(symbol) => output.push_str(symbol),
                        None => output.push(c),
                    }
                }
                None => output.push(c),
            }
        }

        output
    }

    /// Resolves one tagged cell through the fallback chain:
    /// exact cell+tag, bare cell, 6-dot cell+tag, bare 6-dot cell.
    pub fn resolve(&self, tagged: TaggedCell) -> Option<&'t str> {
        if let Some(symbol) = self.lookup(&tagged.to_string()) {
            return Some(symbol);
        }

        if tagged.tag.is_some() {
            if let Some(symbol) = self.lookup_cell(tagged.cell) {
                return Some(symbol);
            }
        }

        if tagged.cell.is_eight_dot() {
            let six_dot = TaggedCell {
                cell: tagged.cell.six_dot(),
                tag: tagged.tag,
            };
            if let Some(symbol) = self.lookup(&six_dot.to_string()) {
                return Some(symbol);
            }
            if let Some(symbol) = self.lookup_cell(six_dot.cell) {
                return Some(symbol);
            }
        }

        None
    }

    /// Tagged mode: every (cell, tag) pair goes through [`Self::resolve`]; a
    /// miss keeps the bare cell and drops the tag.
    pub fn from_tagged(&self, tagged: &TaggedText) -> String {
        let mut output = String::with_capacity(tagged.len() * 2);

        for token in tagged.tokens() {
            match token {
                Token::Cell(cell) if cell.cell.is_blank() => output.push(' '),
                Token::Cell(cell) => match self.resolve(*cell) {
                    Some(symbol) => output.push_str(symbol),
                    None => output.push(cell.cell.to_char()),
                },
                Token::Text(c) => output.push(*c),
            }
        }

        output
    }
}

/// Maps Unicode braille, clean or tagged, into the alphabet of `table`.
///
/// Cells the table cannot represent are degraded or passed through, never
/// reported as errors.
pub fn from_unicode(table: &CodeTable, input: UnicodeInput<'_>) -> String {
    let index = ReverseIndex::new(table);
    match input {
        UnicodeInput::Clean(text) => index.from_clean(text),
        UnicodeInput::Tagged(tagged) => index.from_tagged(tagged),
    }
}

/// Canonical array index of a key: decimal digits, no leading zero, below
/// `u32::MAX`.
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse::<u32>().ok().filter(|&index| index != u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcode::tagged::Tag;

    fn table(entries: &[(&str, &str)]) -> CodeTable {
        let characters = entries.iter().map(|(k, v)| (k.to_string(), v.to_string()));
        CodeTable::new("test", characters, "windows-1251", "brl", false).unwrap()
    }

    fn cell(c: char) -> BrailleCell {
        BrailleCell::from_char(c).unwrap()
    }

    #[test]
    fn test_clean_direct_match() {
        let t = table(&[("a", "⠁"), ("b", "⠃")]);
        assert_eq!(from_unicode(&t, UnicodeInput::Clean("⠁⠃")), "ab");
    }

    #[test]
    fn test_clean_degrades_eight_dot_cells() {
        let t = table(&[("l", "⠇")]);
        assert_eq!(from_unicode(&t, UnicodeInput::Clean("⡇")), "l");
    }

    #[test]
    fn test_clean_prefers_direct_eight_dot_match() {
        let t = table(&[("l", "⠇"), ("L", "⡇")]);
        assert_eq!(from_unicode(&t, UnicodeInput::Clean("⡇⠇")), "Ll");
    }

    #[test]
    fn test_clean_passes_unmappable_through() {
        let t = table(&[("a", "⠁")]);
        assert_eq!(from_unicode(&t, UnicodeInput::Clean("⠁⠿x\u{2800}")), "a⠿x ");
    }

    #[test]
    fn test_resolve_exact_tagged_match_wins() {
        let t = table(&[("Q", "⣁A"), ("q", "⣁"), ("x", "⠁A"), ("y", "⠁")]);
        let index = ReverseIndex::new(&t);
        let tagged = TaggedCell::tagged(cell('⣁'), Tag::Marker('A'));
        assert_eq!(index.resolve(tagged), Some("Q"));
    }

    #[test]
    fn test_resolve_bare_cell_before_six_dot() {
        let t = table(&[("q", "⣁"), ("x", "⠁A")]);
        let index = ReverseIndex::new(&t);
        let tagged = TaggedCell::tagged(cell('⣁'), Tag::Marker('A'));
        assert_eq!(index.resolve(tagged), Some("q"));
    }

    #[test]
    fn test_resolve_six_dot_keeps_tag_before_dropping_it() {
        let t = table(&[("x", "⠁A"), ("y", "⠁")]);
        let index = ReverseIndex::new(&t);
        let tagged = TaggedCell::tagged(cell('⣁'), Tag::Marker('A'));
        assert_eq!(index.resolve(tagged), Some("x"));

        let t = table(&[("y", "⠁")]);
        let index = ReverseIndex::new(&t);
        assert_eq!(index.resolve(tagged), Some("y"));
    }

    #[test]
    fn test_resolve_six_dot_cell_is_not_degraded() {
        let t = table(&[("y", "⠁")]);
        let index = ReverseIndex::new(&t);
        assert_eq!(index.resolve(TaggedCell::bare(cell('⠃'))), None);
    }

    #[test]
    fn test_tagged_miss_keeps_bare_cell() {
        let t = table(&[("a", "⠁")]);
        let tagged = TaggedText::parse("⠿B⣿0⠁0");
        assert_eq!(from_unicode(&t, UnicodeInput::Tagged(&tagged)), "⠿⣿a");
    }

    #[test]
    fn test_tagged_blank_and_text() {
        let t = table(&[("a", "⠁")]);
        let mut tagged = TaggedText::parse("⠁0\u{2800}0");
        tagged.push(Token::Text('\n'));
        assert_eq!(from_unicode(&t, UnicodeInput::Tagged(&tagged)), "a \n");
    }

    #[test]
    fn test_duplicate_values_keep_last_key() {
        let t = table(&[("b", "⠁"), ("a", "⠁")]);
        assert_eq!(from_unicode(&t, UnicodeInput::Clean("⠁")), "a");

        let t = table(&[("a", "⠁"), ("b", "⠁")]);
        assert_eq!(from_unicode(&t, UnicodeInput::Clean("⠁")), "b");
    }

    #[test]
    fn test_index_keys_are_visited_before_named_keys() {
        let t = table(&[("a", "⠁"), ("1", "⠁")]);
        assert_eq!(from_unicode(&t, UnicodeInput::Clean("⠁")), "a");

        let t = table(&[("10", "⠃"), ("2", "⠃")]);
        assert_eq!(from_unicode(&t, UnicodeInput::Clean("⠃")), "10");

        // "01" is not an array index, so it keeps its table position
        let t = table(&[("01", "⠉"), ("c", "⠉")]);
        assert_eq!(from_unicode(&t, UnicodeInput::Clean("⠉")), "c");
    }

    #[test]
    fn test_array_index() {
        assert_eq!(array_index("0"), Some(0));
        assert_eq!(array_index("42"), Some(42));
        assert_eq!(array_index("01"), None);
        assert_eq!(array_index("-1"), None);
        assert_eq!(array_index("4294967295"), None);
        assert_eq!(array_index("a"), None);
        assert_eq!(array_index(""), None);
    }
}
