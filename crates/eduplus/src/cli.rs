//! CLI command structure using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eduplus-barcode")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (TOML)
    #[arg(long, global = true, value_name = "PATH", env = "EDUPLUS_BARCODE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the bundled renderer artifacts
    #[arg(long, global = true, value_name = "DIR")]
    pub bin_dir: Option<PathBuf>,

    /// Treat a host capability as unavailable (repeatable)
    #[arg(long = "disable", global = true, value_name = "CAPABILITY")]
    pub disable: Vec<String>,

    /// Renderer timeout in seconds, 0 to wait indefinitely
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a barcode image
    Generate {
        /// Content to encode
        #[arg(short, long)]
        text: String,

        /// Output image path
        #[arg(short, long)]
        output: PathBuf,

        /// Symbology: code128, code39 or ean13
        #[arg(long = "type", value_name = "TYPE")]
        barcode_type: Option<String>,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        height: Option<u32>,

        /// Print the image as base64 instead of a status line
        #[arg(long)]
        base64: bool,
    },

    /// Show which renderer binary would be used
    Resolve {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
