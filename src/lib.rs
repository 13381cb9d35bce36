//! Transcoding between Unicode braille and legacy braille code pages.
//!
//! A legacy code page is described by a [`CodeTable`]: a map from symbols in
//! some single-byte encoding to Unicode braille cells. [`convert`] moves
//! bytes between any two [`Format`]s, where a format is either a table or
//! plain Unicode braille.

mod charset;
mod convert;
mod core;
mod errors;
pub mod transcode;

pub use charset::{Decoded, detect_and_decode, detect_encoding};
pub use convert::{ConversionRequest, convert, output_file_name, output_path_for};
pub use crate::core::cell::{BLANK, BRAILLE_BASE, BrailleCell, is_braille, strip_lowered_dots};
pub use crate::core::config::{FormatRegistry, Settings};
pub use crate::core::table::{CodeTable, Format};
pub use errors::{ConvertError, TableError, disable_color, find_closest_name};

/// Re-exported so callers can name encodings without a direct dependency.
pub use encoding_rs::Encoding;
