//! Table-driven transcoding between legacy code pages and Unicode braille.
//!
//! The forward transcoder produces [`TaggedText`]; the normalizer and the
//! reverse transcoder consume it. Nothing here touches bytes.

pub mod forward;
pub mod normalize;
pub mod reverse;
pub mod tagged;

pub use forward::{ForwardTranscoder, to_unicode};
pub use normalize::{clean_unicode_text, clear_unicode, should_strip};
pub use reverse::{ReverseIndex, UnicodeInput, from_unicode};
pub use tagged::{Tag, TaggedCell, TaggedText, Token};
