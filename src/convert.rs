use crate::charset;
use crate::core::table::Format;
use crate::errors::ConvertError;
use crate::transcode::{clean_unicode_text, clear_unicode, forward, reverse};
use std::path::{Path, PathBuf};

/// One conversion: source and destination formats, the raw input, and options.
///
/// Requests hold no state beyond their arguments and are consumed by
/// [`ConversionRequest::run`].
///
/// # Example
///
/// ```
/// use brlc::{CodeTable, ConversionRequest, Format};
///
/// let characters = [
///     ("a".to_string(), "⠁".to_string()),
///     ("b".to_string(), "⠃".to_string()),
/// ];
/// let table = Format::from(CodeTable::new("demo", characters, "ascii", "brf", false).unwrap());
///
/// let output = ConversionRequest::new(&Format::Unicode, &table, "⠁⠃".as_bytes())
///     .run()
///     .unwrap();
/// assert_eq!(output, b"ab");
/// ```
#[derive(Debug, Clone)]
pub struct ConversionRequest<'a> {
    source: &'a Format,
    destination: &'a Format,
    input: &'a [u8],
    force_6dot: bool,
    input_encoding: Option<&'a str>,
}

impl<'a> ConversionRequest<'a> {
    pub fn new(source: &'a Format, destination: &'a Format, input: &'a [u8]) -> Self {
        ConversionRequest {
            source,
            destination,
            input,
            force_6dot: false,
            input_encoding: None,
        }
    }

    /// Lower dots 7 and 8 even when the source table is an 8-dot table.
    pub fn force_6dot(mut self, force: bool) -> Self {
        self.force_6dot = force;
        self
    }

    /// Read the input with this encoding label instead of detecting it.
    pub fn input_encoding(mut self, label: Option<&'a str>) -> Self {
        self.input_encoding = label;
        self
    }

    pub fn run(self) -> Result<Vec<u8>, ConvertError> {
        let decoded = match self.input_encoding {
            Some(label) => charset::decode_with_label(self.input, label)?,
            None => charset::detect_and_decode(self.input)?,
        };
        log::debug!(
            "converting {} -> {} ({} bytes read as {})",
            self.source.name(),
            self.destination.name(),
            self.input.len(),
            decoded.encoding.name()
        );

        let text = match (self.source, self.destination) {
            (Format::Unicode, Format::Unicode) => {
                clean_unicode_text(&decoded.text, self.force_6dot)
            }
            (Format::Unicode, Format::Table(destination)) => {
                reverse::from_unicode(destination, reverse::UnicodeInput::Clean(&decoded.text))
            }
            (Format::Table(source), Format::Unicode) => {
                let tagged = forward::to_unicode(source, &decoded.text);
                clear_unicode(&tagged, source.is_8dot(), self.force_6dot)
            }
            (Format::Table(source), Format::Table(destination)) => {
                let tagged = forward::to_unicode(source, &decoded.text);
                reverse::from_unicode(destination, reverse::UnicodeInput::Tagged(&tagged))
            }
        };

        charset::encode(&text, self.destination.encoding())
    }
}

/// Converts `input` from `source` to `destination`.
///
/// This is the engine entry point; it is a shorthand for a
/// [`ConversionRequest`] without a declared input encoding.
pub fn convert(
    source: &Format,
    destination: &Format,
    input: &[u8],
    force_6dot: bool,
) -> Result<Vec<u8>, ConvertError> {
    ConversionRequest::new(source, destination, input)
        .force_6dot(force_6dot)
        .run()
}

/// File name for the converted form of `input`: its stem plus the
/// destination's extension (`.txt` for Unicode).
pub fn output_file_name(input: &Path, destination: &Format) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    PathBuf::from(format!("{}{}", stem, destination.output_extension()))
}

/// `input` with its extension swapped for the destination's, in the same directory.
pub fn output_path_for(input: &Path, destination: &Format) -> PathBuf {
    let file_name = output_file_name(input, destination);
    match input.parent() {
        Some(parent) => parent.join(file_name),
        None => file_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table::CodeTable;

    fn format(name: &str, entries: &[(&str, &str)], encoding: &str, is_8dot: bool) -> Format {
        let characters = entries.iter().map(|(k, v)| (k.to_string(), v.to_string()));
        Format::from(CodeTable::new(name, characters, encoding, name, is_8dot).unwrap())
    }

    #[test]
    fn test_unicode_to_unicode_cleans_blank() {
        let output = convert(&Format::Unicode, &Format::Unicode, "⠁\u{2800}⠃".as_bytes(), false)
            .unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "⠁ ⠃");
    }

    #[test]
    fn test_unicode_to_unicode_force_6dot() {
        let output =
            convert(&Format::Unicode, &Format::Unicode, "⡇⠇".as_bytes(), true).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "⠇⠇");

        let output =
            convert(&Format::Unicode, &Format::Unicode, "⡇⠇".as_bytes(), false).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "⡇⠇");
    }

    #[test]
    fn test_unicode_to_table() {
        let a = format("a", &[("a", "⠁"), ("b", "⠃")], "ascii", false);
        let output = convert(&Format::Unicode, &a, "⠁⠃".as_bytes(), false).unwrap();
        assert_eq!(output, b"ab");
    }

    #[test]
    fn test_table_to_unicode() {
        let a = format("a", &[("a", "⠁"), ("b", "⠃"), ("l", "⡇")], "ascii", false);
        let output = convert(&a, &Format::Unicode, b"ab l", false).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "⠁⠃ ⠇");
    }

    #[test]
    fn test_eight_dot_table_keeps_lowered_dots() {
        let a = format("a", &[("l", "⡇")], "ascii", true);
        let output = convert(&a, &Format::Unicode, b"l", false).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "⡇");

        let output = convert(&a, &Format::Unicode, b"l", true).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "⠇");
    }

    #[test]
    fn test_table_to_table() {
        let source = format("src", &[("a", "⠁"), ("b", "⠃")], "ascii", false);
        let destination = format("dst", &[("x", "⠁"), ("y", "⠃")], "ascii", false);
        let output = convert(&source, &destination, b"ab ba", false).unwrap();
        assert_eq!(output, b"xy yx");
    }

    #[test]
    fn test_unencodable_output_is_an_error() {
        let a = format("a", &[("a", "⠁")], "ascii", false);
        let err = convert(&Format::Unicode, &a, "⠁⠿".as_bytes(), false).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::UnencodableCharacter { character: '⠿', .. }
        ));
    }

    #[test]
    fn test_declared_input_encoding() {
        let a = format("a", &[("а", "⠁")], "windows-1251", false);
        let output = ConversionRequest::new(&a, &Format::Unicode, &[0xE0])
            .input_encoding(Some("windows-1251"))
            .run()
            .unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "⠁");
    }

    #[test]
    fn test_output_file_name() {
        let a = format("brf", &[("a", "⠁")], "ascii", false);
        assert_eq!(
            output_file_name(Path::new("books/story.txt"), &a),
            PathBuf::from("story.brf")
        );
        assert_eq!(
            output_file_name(Path::new("story.brf"), &Format::Unicode),
            PathBuf::from("story.txt")
        );
        assert_eq!(
            output_path_for(Path::new("books/story.txt"), &a),
            PathBuf::from("books/story.brf")
        );
    }
}
