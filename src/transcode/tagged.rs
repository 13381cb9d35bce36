//! The intermediate representation between the forward and reverse transcoders.
//!
//! Plain Unicode braille cannot tell apart two source symbols that share a
//! cell. The forward transcoder therefore emits cells that may carry a tag: a
//! virtual-dot marker letter taken from the source table, or the synthetic base
//! tag for plain one-cell 6-dot mappings. A tag always belongs to exactly one
//! cell.

use crate::core::cell::BrailleCell;
use std::fmt;

/// Disambiguation tag attached to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Untagged one-cell 6-dot mapping (written `0`)
    Base,
    /// Virtual-dot marker letter `A`-`Z`
    Marker(char),
}

impl Tag {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Tag::Base),
            'A'..='Z' => Some(Tag::Marker(c)),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Tag::Base => '0',
            Tag::Marker(c) => c,
        }
    }
}

/// A cell together with its optional tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaggedCell {
    pub cell: BrailleCell,
    pub tag: Option<Tag>,
}

impl TaggedCell {
    pub fn bare(cell: BrailleCell) -> Self {
        TaggedCell { cell, tag: None }
    }

    pub fn tagged(cell: BrailleCell, tag: Tag) -> Self {
        TaggedCell {
            cell,
            tag: Some(tag),
        }
    }
}

impl fmt::Display for TaggedCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cell)?;
        if let Some(tag) = self.tag {
            write!(f, "{}", tag.as_char())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Cell(TaggedCell),
    /// A character that no table entry produced; passed through untouched
    Text(char),
}

/// Sequence of tagged cells and pass-through text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedText {
    tokens: Vec<Token>,
}

impl TaggedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        TaggedText {
            tokens: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn extend_from_slice(&mut self, tokens: &[Token]) {
        self.tokens.extend_from_slice(tokens);
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Parses a cell string as written in a table value: braille cells, each
    /// optionally followed by one tag character. Anything else is text.
    pub fn parse(value: &str) -> Self {
        let mut text = TaggedText::with_capacity(value.chars().count());
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            match BrailleCell::from_char(c) {
                Some(cell) => {
                    let tag = chars.peek().copied().and_then(Tag::from_char);
                    if tag.is_some() {
                        chars.next();
                    }
                    text.push(Token::Cell(TaggedCell { cell, tag }));
                }
                None => text.push(Token::Text(c)),
            }
        }

        text
    }
}

impl fmt::Display for TaggedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            match token {
                Token::Cell(cell) => write!(f, "{}", cell)?,
                Token::Text(c) => write!(f, "{}", c)?,
            }
        }
        Ok(())
    }
}
