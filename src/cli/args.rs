use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a file, or every file in a directory, between formats
    Convert(ConvertArgs),

    /// Inspect the available formats
    Formats {
        #[command(subcommand)]
        action: FormatsAction,
    },
}

/// Arguments for converting files
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input file or directory
    #[arg(short = 'i', long, value_name = "PATH")]
    pub input: PathBuf,

    /// Source format (default: `default_from` setting, else unicode)
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub from: Option<String>,

    /// Destination format (default: `default_to` setting, else unicode)
    #[arg(short = 't', long, value_name = "FORMAT")]
    pub to: Option<String>,

    /// Output file, or output directory when the input is a directory
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Lower dots 7 and 8 on Unicode output even for 8-dot tables
    #[arg(long = "force-6dot", overrides_with = "no_force_6dot")]
    pub force_6dot: bool,

    /// Keep dots 7 and 8, overriding the `force_6dot` setting
    #[arg(long = "no-force-6dot", overrides_with = "force_6dot")]
    pub no_force_6dot: bool,

    /// Read input with this encoding instead of detecting it
    #[arg(long, value_name = "LABEL")]
    pub input_encoding: Option<String>,
}

impl ConvertArgs {
    /// The command-line choice for lowering dots 7 and 8, else `default`.
    pub fn force_6dot_or(&self, default: bool) -> bool {
        if self.force_6dot {
            true
        } else if self.no_force_6dot {
            false
        } else {
            default
        }
    }
}

/// Formats subcommand actions
#[derive(Subcommand, Debug)]
pub enum FormatsAction {
    /// List available formats
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show details for a specific format
    Show {
        /// Format name
        name: String,
    },
}
