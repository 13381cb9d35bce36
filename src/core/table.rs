use crate::errors::TableError;
use encoding_rs::Encoding;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

/// On-disk shape of a code table (one JSON file per legacy format).
#[derive(Debug, Deserialize)]
struct TableFile {
    /// Source symbol -> braille cell string, in document order
    characters: serde_json::Map<String, serde_json::Value>,
    /// Byte encoding label used to read and write this format
    encoding: String,
    /// Conventional file extension, without the dot
    format: String,
    /// Whether the repertoire legitimately uses dots 7 and 8
    #[serde(rename = "8dots", default)]
    eight_dots: bool,
    #[serde(default)]
    description: Option<String>,
}

/// A legacy braille code page: a symbol-to-cell mapping plus byte-level metadata.
///
/// Tables are immutable once built and are shared between conversions through
/// [`Format`].
#[derive(Debug, Clone)]
pub struct CodeTable {
    name: String,
    characters: Vec<(String, String)>,
    encoding: &'static Encoding,
    file_extension: String,
    is_8dot: bool,
    description: Option<String>,
}

impl CodeTable {
    /// Parses a table from its JSON text. `name` is the registry name, usually
    /// the file stem.
    pub fn from_json(name: &str, content: &str) -> Result<Self, TableError> {
        let file: TableFile = serde_json::from_str(content).map_err(|source| TableError::Json {
            name: name.to_string(),
            source,
        })?;

        let mut characters = Vec::with_capacity(file.characters.len());
        for (key, value) in file.characters {
            match value {
                serde_json::Value::String(cells) => characters.push((key, cells)),
                _ => {
                    return Err(TableError::InvalidEntry {
                        name: name.to_string(),
                        key,
                    });
                }
            }
        }

        let mut table = Self::new(
            name,
            characters,
            &file.encoding,
            &file.format,
            file.eight_dots,
        )?;
        table.description = file.description;
        Ok(table)
    }

    /// Builds a table from its parts, validating the encoding label and entries.
    ///
    /// Entry order is kept. A repeated key keeps its first position and takes
    /// its last value.
    pub fn new(
        name: &str,
        characters: impl IntoIterator<Item = (String, String)>,
        encoding_label: &str,
        file_extension: &str,
        is_8dot: bool,
    ) -> Result<Self, TableError> {
        if encoding_label.trim().is_empty() {
            return Err(TableError::EmptyField {
                name: name.to_string(),
                field: "encoding",
            });
        }
        if file_extension.trim().is_empty() {
            return Err(TableError::EmptyField {
                name: name.to_string(),
                field: "format",
            });
        }

        let encoding = Encoding::for_label(encoding_label.trim().as_bytes()).ok_or_else(|| {
            TableError::UnknownEncoding {
                name: name.to_string(),
                label: encoding_label.to_string(),
            }
        })?;

        let mut entries: Vec<(String, String)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for (key, value) in characters {
            match positions.get(&key) {
                Some(&index) => entries[index].1 = value,
                None => {
                    positions.insert(key.clone(), entries.len());
                    entries.push((key, value));
                }
            }
        }

        if let Some((key, _)) = entries
            .iter()
            .find(|(key, value)| key.is_empty() || value.is_empty())
        {
            return Err(TableError::InvalidEntry {
                name: name.to_string(),
                key: key.clone(),
            });
        }

        Ok(CodeTable {
            name: name.to_string(),
            characters: entries,
            encoding,
            file_extension: file_extension.trim_start_matches('.').to_string(),
            is_8dot,
            description: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Symbol -> cell string entries in table order, including virtual-dot
    /// marker entries. Keys are unique.
    pub fn characters(&self) -> &[(String, String)] {
        &self.characters
    }

    /// Byte encoding this format is serialized with.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    pub fn is_8dot(&self) -> bool {
        self.is_8dot
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Number of entries whose key is a virtual-dot marker letter.
    pub fn marker_count(&self) -> usize {
        self.characters
            .iter()
            .filter(|(key, _)| marker_letter(key).is_some())
            .count()
    }
}

/// Returns the letter if `key` is a virtual-dot marker (a single `A`-`Z`).
pub(crate) fn marker_letter(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => Some(c),
        _ => None,
    }
}

/// Source or destination of a conversion.
#[derive(Debug, Clone)]
pub enum Format {
    /// Unicode braille written as UTF-8; no table involved
    Unicode,
    /// A legacy code page
    Table(Arc<CodeTable>),
}

impl Format {
    pub const UNICODE_NAME: &'static str = "unicode";

    pub fn name(&self) -> &str {
        match self {
            Format::Unicode => Self::UNICODE_NAME,
            Format::Table(table) => table.name(),
        }
    }

    pub fn table(&self) -> Option<&CodeTable> {
        match self {
            Format::Unicode => None,
            Format::Table(table) => Some(table.as_ref()),
        }
    }

    pub fn is_unicode(&self) -> bool {
        matches!(self, Format::Unicode)
    }

    /// Byte encoding of the output side of this format.
    pub fn encoding(&self) -> &'static Encoding {
        match self {
            Format::Unicode => encoding_rs::UTF_8,
            Format::Table(table) => table.encoding(),
        }
    }

    /// Output file extension including the leading dot: `.txt` for Unicode.
    pub fn output_extension(&self) -> String {
        match self {
            Format::Unicode => ".txt".to_string(),
            Format::Table(table) => format!(".{}", table.file_extension()),
        }
    }
}

impl From<CodeTable> for Format {
    fn from(table: CodeTable) -> Self {
        Format::Table(Arc::new(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "characters": { "a": "⠁", "b": "⠃", "A": "⠁A" },
        "encoding": "windows-1251",
        "format": "brl",
        "8dots": true,
        "description": "sample"
    }"#;

    #[test]
    fn test_from_json() {
        let table = CodeTable::from_json("sample", SAMPLE).unwrap();
        assert_eq!(table.name(), "sample");
        assert_eq!(table.characters().len(), 3);
        assert_eq!(table.encoding(), encoding_rs::WINDOWS_1251);
        assert_eq!(table.file_extension(), "brl");
        assert!(table.is_8dot());
        assert_eq!(table.description(), Some("sample"));
        assert_eq!(table.marker_count(), 1);
    }

    #[test]
    fn test_8dots_defaults_to_false() {
        let json = r#"{ "characters": { "a": "⠁" }, "encoding": "ascii", "format": "brf" }"#;
        let table = CodeTable::from_json("plain", json).unwrap();
        assert!(!table.is_8dot());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let json = r#"{ "characters": { "a": "⠁" }, "format": "brf" }"#;
        let err = CodeTable::from_json("broken", json).unwrap_err();
        assert!(matches!(err, TableError::Json { .. }));
    }

    #[test]
    fn test_unknown_encoding_is_rejected() {
        let json = r#"{ "characters": { "a": "⠁" }, "encoding": "klingon", "format": "brf" }"#;
        let err = CodeTable::from_json("broken", json).unwrap_err();
        assert!(matches!(err, TableError::UnknownEncoding { .. }));
    }

    #[test]
    fn test_empty_value_is_rejected() {
        let json = r#"{ "characters": { "a": "" }, "encoding": "ascii", "format": "brf" }"#;
        let err = CodeTable::from_json("broken", json).unwrap_err();
        assert!(matches!(err, TableError::InvalidEntry { .. }));
    }

    #[test]
    fn test_entries_keep_document_order() {
        let json = r#"{ "characters": { "z": "⠵", "1": "⠂", "a": "⠁" }, "encoding": "ascii", "format": "brf" }"#;
        let table = CodeTable::from_json("ordered", json).unwrap();
        let keys: Vec<&str> = table.characters().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["z", "1", "a"]);
    }

    #[test]
    fn test_non_string_value_is_rejected() {
        let json = r#"{ "characters": { "a": 1 }, "encoding": "ascii", "format": "brf" }"#;
        let err = CodeTable::from_json("broken", json).unwrap_err();
        assert!(matches!(err, TableError::InvalidEntry { key, .. } if key == "a"));
    }

    #[test]
    fn test_repeated_key_takes_last_value() {
        let characters = [("a", "⠁"), ("b", "⠃"), ("a", "⠉")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()));
        let table = CodeTable::new("repeat", characters, "ascii", "brf", false).unwrap();
        assert_eq!(
            table.characters(),
            [
                ("a".to_string(), "⠉".to_string()),
                ("b".to_string(), "⠃".to_string())
            ]
        );
    }

    #[test]
    fn test_marker_letter() {
        assert_eq!(marker_letter("A"), Some('A'));
        assert_eq!(marker_letter("Z"), Some('Z'));
        assert_eq!(marker_letter("a"), None);
        assert_eq!(marker_letter("AB"), None);
        assert_eq!(marker_letter("Ä"), None);
    }

    #[test]
    fn test_format_extension() {
        let table = CodeTable::from_json("sample", SAMPLE).unwrap();
        assert_eq!(Format::from(table).output_extension(), ".brl");
        assert_eq!(Format::Unicode.output_extension(), ".txt");
        assert_eq!(Format::Unicode.encoding(), encoding_rs::UTF_8);
    }
}
