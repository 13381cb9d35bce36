use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

static COLOR_DISABLED: AtomicBool = AtomicBool::new(false);

/// Turns off ANSI colours in error messages for the rest of the process.
pub fn disable_color() {
    COLOR_DISABLED.store(true, Ordering::Relaxed);
}

/// Errors that can abort a single conversion.
///
/// A braille cell that the destination table cannot represent is *not* an
/// error: the reverse transcoder degrades or passes such cells through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// The byte encoding of the input could not be determined with confidence
    UndetectableEncoding {
        /// Encoding the detector leaned towards before the decode check failed
        guess: &'static str,
    },
    /// The destination byte encoding cannot represent a produced character
    UnencodableCharacter {
        character: char,
        position: usize,
        encoding: &'static str,
    },
    /// An explicitly requested input encoding label is not recognised
    UnknownEncoding { label: String },
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::UndetectableEncoding { guess } => {
                write_header(f, "cannot determine the byte encoding of the input")?;
                writeln!(f)?;
                writeln!(f, "  best guess was {}, but the input is malformed in it", guess)?;
                writeln!(f)?;
                write_hint(f, "pass --input-encoding to name the encoding explicitly")
            }
            ConvertError::UnencodableCharacter {
                character,
                position,
                encoding,
            } => {
                write_header(
                    f,
                    &format!(
                        "character '{}' (U+{:04X}) at position {} cannot be written as {}",
                        character, *character as u32, position, encoding
                    ),
                )?;
                writeln!(f)?;
                write_hint(
                    f,
                    "the destination table does not cover this symbol; extend the table or pick another format",
                )
            }
            ConvertError::UnknownEncoding { label } => {
                write_header(f, &format!("unknown byte encoding '{}'", label))?;
                writeln!(f)?;
                write_hint(f, "use a WHATWG encoding label such as utf-8, ibm866 or windows-1251")
            }
        }
    }
}

impl std::error::Error for ConvertError {}

/// Configuration errors raised while loading code tables or settings.
///
/// These surface before any conversion starts.
#[derive(Debug)]
pub enum TableError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A table file is not valid JSON or misses a required field
    Json {
        name: String,
        source: serde_json::Error,
    },
    /// The settings file is not valid TOML
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// The table names a byte encoding that is not supported
    UnknownEncoding { name: String, label: String },
    /// A required field is present but empty
    EmptyField { name: String, field: &'static str },
    /// A `characters` entry has an empty key or value
    InvalidEntry { name: String, key: String },
    /// No format with this name is registered
    NotFound {
        name: String,
        suggestion: Option<String>,
    },
}

impl TableError {
    pub fn not_found(name: impl Into<String>, available: &[String]) -> Self {
        let name = name.into();
        let suggestion = find_closest_name(&name, available);
        TableError::NotFound { name, suggestion }
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::Io { path, source } => {
                write_header(f, &format!("cannot read {}: {}", path.display(), source))
            }
            TableError::Json { name, source } => {
                write_header(f, &format!("table '{}' is malformed: {}", name, source))?;
                writeln!(f)?;
                write_hint(
                    f,
                    "a table needs `characters`, `encoding` and `format`; `8dots` is optional",
                )
            }
            TableError::Toml { path, source } => write_header(
                f,
                &format!("settings file {} is malformed: {}", path.display(), source),
            ),
            TableError::UnknownEncoding { name, label } => {
                write_header(
                    f,
                    &format!("table '{}' uses unknown encoding '{}'", name, label),
                )?;
                writeln!(f)?;
                write_hint(f, "use a WHATWG encoding label such as utf-8, ibm866 or windows-1251")
            }
            TableError::EmptyField { name, field } => write_header(
                f,
                &format!("table '{}' has an empty `{}` field", name, field),
            ),
            TableError::InvalidEntry { name, key } => write_header(
                f,
                &format!(
                    "table '{}' has an empty symbol or cell string in entry {:?}",
                    name, key
                ),
            ),
            TableError::NotFound { name, suggestion } => {
                writeln!(f, "{}", header_text(&format!("format '{}' not found", name)))?;
                writeln!(f)?;
                if let Some(suggestion) = suggestion {
                    write_hint(f, &format!("did you mean '{}'?", suggestion))?;
                    writeln!(f)?;
                }
                if should_use_color() {
                    write!(
                        f,
                        "      run \x1b[1m`brlc formats list`\x1b[0m to see all formats"
                    )
                } else {
                    write!(f, "      run `brlc formats list` to see all formats")
                }
            }
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::Io { source, .. } => Some(source),
            TableError::Json { source, .. } => Some(source),
            TableError::Toml { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn header_text(message: &str) -> String {
    if should_use_color() {
        format!("\x1b[1;31merror:\x1b[0m {}", message)
    } else {
        format!("error: {}", message)
    }
}

fn write_header(f: &mut fmt::Formatter<'_>, message: &str) -> fmt::Result {
    write!(f, "{}", header_text(message))
}

fn write_hint(f: &mut fmt::Formatter<'_>, hint: &str) -> fmt::Result {
    if should_use_color() {
        write!(f, "\x1b[1;36mhint:\x1b[0m {}", hint)
    } else {
        write!(f, "hint: {}", hint)
    }
}

/// Check if colored output should be used
fn should_use_color() -> bool {
    // Respect NO_COLOR environment variable
    if COLOR_DISABLED.load(Ordering::Relaxed) || std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    use std::io::IsTerminal;
    std::io::stderr().is_terminal()
}

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let len1 = s1.chars().count();
    let len2 = s2.chars().count();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    let mut prev_row: Vec<usize> = (0..=len2).collect();
    let mut curr_row = vec![0; len2 + 1];

    for (i, c1) in s1.chars().enumerate() {
        curr_row[0] = i + 1;

        for (j, c2) in s2.chars().enumerate() {
            let cost = if c1 == c2 { 0 } else { 1 };
            curr_row[j + 1] = (curr_row[j] + 1)
                .min(prev_row[j + 1] + 1)
                .min(prev_row[j] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[len2]
}

/// Find the closest registered format name, if any is close enough to be a typo.
pub fn find_closest_name(name: &str, available: &[String]) -> Option<String> {
    let threshold = if name.chars().count() < 5 { 2 } else { 3 };

    available
        .iter()
        .map(|candidate| (levenshtein_distance(name, candidate), candidate))
        .filter(|(distance, _)| *distance <= threshold)
        .min_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)))
        .map(|(_, candidate)| candidate.clone())
}
