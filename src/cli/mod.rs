mod args;
mod commands;
mod global;
mod handlers;

use args::Commands;
use brlc::{FormatRegistry, Settings};
use clap::Parser;
use global::GlobalArgs;

#[derive(Parser)]
#[command(name = "brlc")]
#[command(version)]
#[command(about = "Convert braille text between Unicode braille and legacy braille code pages", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG, when set, wins over -v/-q
    env_logger::Builder::new()
        .filter_level(cli.global.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    if cli.global.no_color {
        brlc::disable_color();
    }

    let settings = Settings::load_with_overrides();
    let registry = FormatRegistry::load_with_overrides(&settings)?;
    log::debug!("{} formats available", registry.names().len());

    match cli.command {
        Commands::Convert(args) => handlers::convert::handle(args, &cli.global, &settings, &registry),
        Commands::Formats { action } => handlers::formats::handle(action, &cli.global, &registry),
    }
}
