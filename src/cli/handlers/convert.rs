use crate::cli::{
    args::ConvertArgs,
    commands::{ConvertOptions, convert_directory, convert_file, default_output_dir},
    global::GlobalArgs,
};
use brlc::{FormatRegistry, Settings, output_path_for};

pub fn handle(
    args: ConvertArgs,
    global: &GlobalArgs,
    settings: &Settings,
    registry: &FormatRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    let from = args.from.as_deref().unwrap_or(&settings.default_from);
    let to = args.to.as_deref().unwrap_or(&settings.default_to);
    let source = registry.resolve(from)?;
    let destination = registry.resolve(to)?;

    let options = ConvertOptions {
        source: &source,
        destination: &destination,
        force_6dot: args.force_6dot_or(settings.force_6dot),
        input_encoding: args.input_encoding.as_deref(),
    };

    if !args.input.is_dir() {
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| output_path_for(&args.input, &destination));
        convert_file(&args.input, &output, &options)
            .map_err(|e| -> Box<dyn std::error::Error> { e })?;
        if !global.quiet {
            println!("Done! {} -> {}", args.input.display(), output.display());
        }
        return Ok(());
    }

    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.input, to));
    let report = convert_directory(&args.input, &output_dir, &options)?;

    if report.is_empty() {
        if !global.quiet {
            println!("No files found in the input directory.");
        }
        return Ok(());
    }

    if !global.quiet {
        for (path, file_name) in &report.converted {
            println!("  Converted: {} -> {}", display_name(path), file_name.display());
        }
    }
    for (path, message) in &report.failed {
        eprintln!("  Error converting {}: {}", display_name(path), message);
    }

    if !global.quiet {
        println!(
            "{} file(s) converted, {} error(s)",
            report.converted.len(),
            report.failed.len()
        );
        println!("Output directory: {}", output_dir.display());
    }

    if !report.failed.is_empty() {
        return Err(format!("{} file(s) could not be converted", report.failed.len()).into());
    }

    Ok(())
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
