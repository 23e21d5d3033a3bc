//! treehuff command-line tool
//!
//! Two-pass Huffman compression of files.
//!
//! ## Usage
//!
//! ```bash
//! # Compress a file
//! treehuff compress notes.txt notes.hf
//!
//! # Restore it
//! treehuff decompress notes.hf notes.txt
//!
//! # Show the code tree stored in a compressed file
//! treehuff inspect notes.hf
//!
//! # Verbose, with buffer sizes from a JSON file
//! treehuff --log-level debug --config treehuff.json compress big.bin big.hf
//! ```

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use treehuff_core::{CompressionRatio, StreamConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "treehuff")]
#[command(version)]
#[command(about = "Two-pass Huffman file compressor", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Configuration file path (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file
    Compress {
        /// File to compress
        input: PathBuf,
        /// Where to write the compressed stream
        output: PathBuf,
    },
    /// Decompress a file produced by `compress`
    Decompress {
        /// Compressed file
        input: PathBuf,
        /// Where to write the restored bytes
        output: PathBuf,
    },
    /// Print the header of a compressed file
    Inspect {
        /// Compressed file
        input: PathBuf,
    },
}

fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => commands::load_config(path)?,
        None => StreamConfig::default(),
    };

    // Initialize logging
    let level = parse_level(args.log_level.as_deref().unwrap_or(&config.log_level));
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Some(path) = &args.config {
        info!("Loaded configuration from {}", path.display());
    }

    match args.command {
        Command::Compress { input, output } => {
            let report = commands::compress_file(&input, &output, &config)?;
            let ratio =
                CompressionRatio::new(report.input_bytes as usize, report.output_bytes as usize);
            info!(
                "header {} bits, payload {} bits, {} distinct bytes, ratio {:.3}",
                report.header_bits,
                report.payload_bits,
                report.distinct_symbols,
                ratio.ratio()
            );
        }
        Command::Decompress { input, output } => {
            let report = commands::decompress_file(&input, &output, &config)?;
            info!(
                "header {} bits, payload {} bits, {} leaves",
                report.header_bits, report.payload_bits, report.leaves
            );
        }
        Command::Inspect { input } => {
            print!("{}", commands::inspect_file(&input, &config)?);
        }
    }

    Ok(())
}
