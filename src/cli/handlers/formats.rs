use crate::cli::{args::FormatsAction, global::GlobalArgs};
use brlc::{BrailleCell, Format, FormatRegistry};

pub fn handle(
    action: FormatsAction,
    _global: &GlobalArgs,
    registry: &FormatRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        FormatsAction::List { json } => handle_list(json, registry),
        FormatsAction::Show { name } => handle_show(&name, registry),
    }
}

fn handle_list(json: bool, registry: &FormatRegistry) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let formats: Vec<serde_json::Value> = registry
            .iter()
            .map(|(name, format)| {
                serde_json::json!({
                    "name": name,
                    "encoding": format.encoding().name(),
                    "extension": format.output_extension(),
                    "8dots": format.table().map(|table| table.is_8dot()),
                })
            })
            .collect();
        let output = serde_json::json!({ "formats": formats });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Available formats:\n");
    for (name, format) in registry.iter() {
        let description = match format {
            Format::Unicode => "Unicode braille (UTF-8)",
            Format::Table(table) => table.description().unwrap_or(""),
        };
        println!(
            "  {:<15} {:<14} {:<6} {}",
            name,
            format.encoding().name(),
            format.output_extension(),
            description
        );
    }

    Ok(())
}

fn handle_show(name: &str, registry: &FormatRegistry) -> Result<(), Box<dyn std::error::Error>> {
    let format = registry.resolve(name)?;

    println!("Format: {}", format.name());

    let table = match format.table() {
        Some(table) => table,
        None => {
            println!("  Type: Unicode braille");
            println!("  Encoding: {}", format.encoding().name());
            println!("  Extension: {}", format.output_extension());
            return Ok(());
        }
    };

    println!("  Type: Code table");
    if let Some(description) = table.description() {
        println!("  Description: {}", description);
    }
    println!("  Encoding: {}", table.encoding().name());
    println!("  Extension: {}", format.output_extension());
    println!("  Dots: {}", if table.is_8dot() { 8 } else { 6 });
    println!("  Entries: {}", table.characters().len());
    if table.marker_count() > 0 {
        println!("  Markers: {}", table.marker_count());
    }

    println!();
    for (key, value) in table.characters() {
        println!("  {:<6} {:<6} {}", format!("{:?}", key), value, dots_of(value));
    }

    Ok(())
}

/// Dot numbers of each cell in `value`, e.g. `1-25` for "⠁⠆".
fn dots_of(value: &str) -> String {
    value
        .chars()
        .map(|c| match BrailleCell::from_char(c) {
            Some(cell) => cell.dot_numbers(),
            None => c.to_string(),
        })
        .collect::<Vec<_>>()
        .join("-")
}
