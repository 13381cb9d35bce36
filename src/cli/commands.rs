use brlc::{ConversionRequest, Format, output_file_name};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub type FileError = Box<dyn std::error::Error + Send + Sync>;

/// Everything a single file conversion needs besides its paths.
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions<'a> {
    pub source: &'a Format,
    pub destination: &'a Format,
    pub force_6dot: bool,
    pub input_encoding: Option<&'a str>,
}

/// Outcome of converting a directory.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// (input file, output file name) for every converted file
    pub converted: Vec<(PathBuf, PathBuf)>,
    /// (input file, error message) for every failure
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn is_empty(&self) -> bool {
        self.converted.is_empty() && self.failed.is_empty()
    }
}

/// Reads `input`, converts it, and writes the result to `output`.
pub fn convert_file(input: &Path, output: &Path, options: &ConvertOptions) -> Result<(), FileError> {
    if is_same_file(input, output) {
        return Err(format!("refusing to overwrite the input file {}", input.display()).into());
    }

    let bytes = fs::read(input)
        .map_err(|e| format!("cannot read {}: {}", input.display(), e))?;
    let converted = ConversionRequest::new(options.source, options.destination, &bytes)
        .force_6dot(options.force_6dot)
        .input_encoding(options.input_encoding)
        .run()?;
    fs::write(output, converted)
        .map_err(|e| format!("cannot write {}: {}", output.display(), e))?;

    log::info!("{} -> {}", input.display(), output.display());
    Ok(())
}

/// Converts every regular file directly inside `input_dir` into `output_dir`.
///
/// Files are converted in parallel; a failing file does not stop the others.
pub fn convert_directory(
    input_dir: &Path,
    output_dir: &Path,
    options: &ConvertOptions,
) -> io::Result<BatchReport> {
    let mut files: Vec<PathBuf> = fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        return Ok(BatchReport::default());
    }

    fs::create_dir_all(output_dir)?;

    let results: Vec<(PathBuf, PathBuf, Result<(), String>)> = files
        .par_iter()
        .map(|path| {
            let file_name = output_file_name(path, options.destination);
            let result = convert_file(path, &output_dir.join(&file_name), options)
                .map_err(|e| e.to_string());
            (path.clone(), file_name, result)
        })
        .collect();

    let mut report = BatchReport::default();
    for (path, file_name, result) in results {
        match result {
            Ok(()) => report.converted.push((path, file_name)),
            Err(message) => report.failed.push((path, message)),
        }
    }

    Ok(report)
}

/// Default directory-mode output: `<input dir name>_<destination>` in the
/// working directory.
pub fn default_output_dir(input_dir: &Path, destination: &str) -> PathBuf {
    let absolute = fs::canonicalize(input_dir).unwrap_or_else(|_| input_dir.to_path_buf());
    let dir_name = absolute
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    PathBuf::from(format!("{}_{}", dir_name, destination))
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
