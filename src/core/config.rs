use crate::core::table::{CodeTable, Format};
use crate::errors::TableError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// Generated by build.rs: `BUNDLED_TABLES`, one (name, json) pair per file in tables/
include!(concat!(env!("OUT_DIR"), "/tables.rs"));

/// Settings file contents; every field is optional so later files only
/// override what they set.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SettingsFile {
    default_from: Option<String>,
    default_to: Option<String>,
    force_6dot: Option<bool>,
    table_dirs: Vec<String>,
}

/// Global settings for brlc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Source format used when `--from` is not given
    pub default_from: String,
    /// Destination format used when `--to` is not given
    pub default_to: String,
    /// Lower dots 7 and 8 on Unicode output by default
    pub force_6dot: bool,
    /// Extra directories searched for table files (`~` is expanded)
    pub table_dirs: Vec<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            default_from: Format::UNICODE_NAME.to_string(),
            default_to: Format::UNICODE_NAME.to_string(),
            force_6dot: false,
            table_dirs: Vec::new(),
        }
    }
}

impl Settings {
    /// Parses settings from TOML content on top of the defaults.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let mut settings = Settings::default();
        settings.apply(toml::from_str(content)?);
        Ok(settings)
    }

    fn apply(&mut self, file: SettingsFile) {
        if let Some(from) = file.default_from {
            self.default_from = from;
        }
        if let Some(to) = file.default_to {
            self.default_to = to;
        }
        if let Some(force) = file.force_6dot {
            self.force_6dot = force;
        }
        self.table_dirs.extend(
            file.table_dirs
                .iter()
                .map(|dir| PathBuf::from(shellexpand::tilde(dir).as_ref())),
        );
    }

    fn apply_file(&mut self, path: &Path) -> Result<(), TableError> {
        let content = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: SettingsFile = toml::from_str(&content).map_err(|source| TableError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        self.apply(file);
        Ok(())
    }

    /// Loads settings from standard locations.
    ///
    /// Searches in priority order:
    /// 1. Built-in defaults
    /// 2. `~/.config/brlc/config.toml` (user settings)
    /// 3. `./brlc.toml` (project-local settings)
    ///
    /// A file that fails to parse is reported and skipped.
    pub fn load_with_overrides() -> Self {
        let mut settings = Settings::default();

        let mut candidates = Vec::new();
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("brlc").join("config.toml"));
        }
        candidates.push(PathBuf::from("brlc.toml"));

        for path in candidates.iter().filter(|path| path.exists()) {
            match settings.apply_file(path) {
                Ok(()) => log::debug!("loaded settings from {}", path.display()),
                Err(e) => log::warn!("ignoring settings file: {}", e),
            }
        }

        settings
    }
}

/// All formats known by name: `unicode` plus every loaded code table.
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    formats: BTreeMap<String, Format>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        let mut formats = BTreeMap::new();
        formats.insert(Format::UNICODE_NAME.to_string(), Format::Unicode);
        FormatRegistry { formats }
    }
}

impl FormatRegistry {
    /// A registry that only knows `unicode`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads the tables bundled with the library.
    pub fn load_default() -> Result<Self, TableError> {
        let mut registry = Self::empty();
        for (name, content) in BUNDLED_TABLES {
            registry.insert(CodeTable::from_json(name, content)?);
        }
        Ok(registry)
    }

    /// Loads bundled tables plus user tables from standard locations.
    ///
    /// Searches in priority order:
    /// 1. Built-in tables (from library)
    /// 2. `~/.config/brlc/tables/*.json` (user tables)
    /// 3. `./tables/*.json` (project-local tables)
    /// 4. `table_dirs` from the settings
    ///
    /// Later tables override earlier ones with the same name.
    pub fn load_with_overrides(settings: &Settings) -> Result<Self, TableError> {
        let mut registry = Self::load_default()?;

        let mut dirs_to_scan = Vec::new();
        if let Some(config_dir) = dirs::config_dir() {
            dirs_to_scan.push(config_dir.join("brlc").join("tables"));
        }
        dirs_to_scan.push(PathBuf::from("tables"));
        dirs_to_scan.extend(settings.table_dirs.iter().cloned());

        for dir in dirs_to_scan.iter().filter(|dir| dir.is_dir()) {
            if let Err(e) = registry.load_dir(dir) {
                log::warn!("skipping table directory {}: {}", dir.display(), e);
            }
        }

        Ok(registry)
    }

    /// Reads one table file; the registry name is the file stem.
    pub fn load_from_file(path: &Path) -> Result<CodeTable, TableError> {
        let content = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        CodeTable::from_json(&name, &content)
    }

    /// Loads every `*.json` file in `dir` (not recursive). Files that fail to
    /// load are logged and skipped. Returns the number of tables loaded.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, TableError> {
        let entries = std::fs::read_dir(dir).map_err(|source| TableError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.is_file())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            match Self::load_from_file(&path) {
                Ok(table) if table.name() == Format::UNICODE_NAME => {
                    log::warn!("{}: the name 'unicode' is reserved", path.display());
                }
                Ok(table) => {
                    log::debug!("loaded table '{}' from {}", table.name(), path.display());
                    self.insert(table);
                    loaded += 1;
                }
                Err(e) => log::warn!("skipping {}: {}", path.display(), e),
            }
        }

        Ok(loaded)
    }

    /// Adds a table, replacing any table with the same name.
    pub fn insert(&mut self, table: CodeTable) {
        self.formats.insert(table.name().to_string(), Format::from(table));
    }

    /// Retrieves a format by name.
    pub fn get(&self, name: &str) -> Option<&Format> {
        self.formats.get(name)
    }

    /// Retrieves a format by name, suggesting a close match when it is missing.
    pub fn resolve(&self, name: &str) -> Result<Format, TableError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| TableError::not_found(name, &self.names()))
    }

    /// Sorted format names, `unicode` included.
    pub fn names(&self) -> Vec<String> {
        self.formats.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Format)> {
        self.formats.iter().map(|(name, format)| (name.as_str(), format))
    }
}
