//! Byte-level decoding and encoding.
//!
//! Detection always looks at the raw input bytes. The source format only
//! supplies a glyph table, never the physical encoding of the file.

use crate::errors::ConvertError;
use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Text decoded from the input together with the encoding it was read as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub encoding: &'static Encoding,
}

/// Guesses the byte encoding of `bytes`. A byte-order mark takes precedence
/// over the statistical guess.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Detects the encoding of `bytes` and decodes them.
///
/// If the guessed encoding cannot decode the input cleanly the guess is not
/// trusted and [`ConvertError::UndetectableEncoding`] is returned.
pub fn detect_and_decode(bytes: &[u8]) -> Result<Decoded, ConvertError> {
    let encoding = detect_encoding(bytes);
    log::debug!("detected input encoding {}", encoding.name());
    decode(bytes, encoding)
}

/// Decodes `bytes` with an explicitly named encoding.
pub fn decode_with_label(bytes: &[u8], label: &str) -> Result<Decoded, ConvertError> {
    let encoding =
        Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| ConvertError::UnknownEncoding {
            label: label.to_string(),
        })?;
    decode(bytes, encoding)
}

fn decode(bytes: &[u8], encoding: &'static Encoding) -> Result<Decoded, ConvertError> {
    // BOM sniffing may switch to the encoding the mark names.
    let (text, actual, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(ConvertError::UndetectableEncoding {
            guess: actual.name(),
        });
    }

    Ok(Decoded {
        text: text.into_owned(),
        encoding: actual,
    })
}

/// Serializes `text` in `encoding`.
///
/// Fails with [`ConvertError::UnencodableCharacter`] on the first character
/// the encoding cannot represent; nothing is replaced or dropped.
pub fn encode(text: &str, encoding: &'static Encoding) -> Result<Vec<u8>, ConvertError> {
    let (bytes, actual, had_unmappable) = encoding.encode(text);
    if !had_unmappable {
        return Ok(bytes.into_owned());
    }

    let mut buf = [0u8; 4];
    let (position, character) = text
        .chars()
        .enumerate()
        .find(|(_, c)| actual.encode(c.encode_utf8(&mut buf)).2)
        .unwrap_or((0, char::REPLACEMENT_CHARACTER));

    Err(ConvertError::UnencodableCharacter {
        character,
        position,
        encoding: actual.name(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_utf8_braille() {
        let bytes = "⠁⠃⠉ ⠙⠑⠋".as_bytes();
        assert_eq!(detect_encoding(bytes), encoding_rs::UTF_8);
        assert_eq!(detect_and_decode(bytes).unwrap().text, "⠁⠃⠉ ⠙⠑⠋");
    }

    #[test]
    fn test_bom_wins() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("⠁".as_bytes());
        let decoded = detect_and_decode(&bytes).unwrap();
        assert_eq!(decoded.encoding, encoding_rs::UTF_8);
        assert_eq!(decoded.text, "⠁");
    }

    #[test]
    fn test_ascii_input_decodes_unchanged() {
        let decoded = detect_and_decode(b"abc def").unwrap();
        assert_eq!(decoded.text, "abc def");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(detect_and_decode(b"").unwrap().text, "");
    }

    #[test]
    fn test_decode_with_label() {
        let decoded = decode_with_label(&[0xC0, 0xE1], "windows-1251").unwrap();
        assert_eq!(decoded.text, "Аб");
        assert_eq!(decoded.encoding, encoding_rs::WINDOWS_1251);
    }

    #[test]
    fn test_decode_with_unknown_label() {
        let err = decode_with_label(b"abc", "klingon").unwrap_err();
        assert!(matches!(err, ConvertError::UnknownEncoding { .. }));
    }

    #[test]
    fn test_malformed_input_is_undetectable() {
        let err = decode_with_label(&[0x61, 0xFF, 0xFE, 0x62], "utf-8").unwrap_err();
        assert!(matches!(err, ConvertError::UndetectableEncoding { .. }));
    }

    #[test]
    fn test_encode_single_byte() {
        let bytes = encode("Аб", encoding_rs::WINDOWS_1251).unwrap();
        assert_eq!(bytes, vec![0xC0, 0xE1]);
    }

    #[test]
    fn test_encode_reports_unencodable_character() {
        let err = encode("ab⠿", encoding_rs::WINDOWS_1252).unwrap_err();
        assert_eq!(
            err,
            ConvertError::UnencodableCharacter {
                character: '⠿',
                position: 2,
                encoding: "windows-1252",
            }
        );
    }
}
