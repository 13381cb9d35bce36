use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=tables");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let dest_path = Path::new(&out_dir).join("tables.rs");
    let mut output = fs::File::create(&dest_path).expect("Failed to create tables.rs");

    writeln!(output, "// Auto-generated table list from build.rs").unwrap();
    writeln!(output).unwrap();
    writeln!(
        output,
        "pub(crate) static BUNDLED_TABLES: &[(&str, &str)] = &["
    )
    .unwrap();

    let table_dir = PathBuf::from("tables");
    for path in collect_tables(&table_dir) {
        embed_table(&table_dir, &path, &mut output);
    }

    writeln!(output, "];").unwrap();
}

fn collect_tables(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Warning: Failed to read directory {:?}: {}", dir, e);
            return Vec::new();
        }
    };

    // Sorted so the generated file is stable between builds
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                eprintln!("Warning: Failed to read entry: {}", e);
                None
            }
        })
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    paths.sort();
    paths
}

fn embed_table(base_dir: &Path, json_path: &Path, output: &mut fs::File) {
    // "tables/brf.json" -> "brf"
    let name = json_path
        .file_stem()
        .and_then(|s| s.to_str())
        .expect("Invalid filename");

    let rel_path = json_path
        .strip_prefix(base_dir)
        .unwrap_or(json_path)
        .to_string_lossy();

    writeln!(
        output,
        "    (\"{}\", include_str!(concat!(env!(\"CARGO_MANIFEST_DIR\"), \"/tables/{}\"))),",
        name, rel_path
    )
    .unwrap();
}
