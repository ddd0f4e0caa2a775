//! ZWL CLI - adaptive LZW file compressor
//!
//! Compresses one file into a `.lzw` stream or restores it.

mod commands;
mod logger;
mod utils;

use clap::{ArgGroup, Parser};
use commands::{CompressOptions, DecompressOptions, cmd_compress, cmd_decompress};
use log::LevelFilter;
use std::path::PathBuf;
use zwl_lzw::{CodeFraming, LzwConfig};

#[derive(Parser)]
#[command(name = "zwl")]
#[command(author, version, about = "Adaptive LZW file compressor")]
#[command(long_about = "
ZWL compresses a single file with adaptive-width LZW coding.

Examples:
  zwl -c notes.txt
  zwl -c image.bmp -r 14 -b -o image.lzw
  zwl -d notes.txt.lzw
  zwl -d notes.txt.lzw -o notes.txt --force
  zwl -c notes.txt -t && zwl -d notes.txt.lzw -t
")]
#[command(group(ArgGroup::new("mode").required(true).args(["compress", "decompress"])))]
struct Cli {
    /// File to compress
    #[arg(short, long, value_name = "FILE")]
    compress: Option<PathBuf>,

    /// File to decompress
    #[arg(short, long, value_name = "FILE")]
    decompress: Option<PathBuf>,

    /// Output file (default: <FILE>.lzw, or <FILE> without .lzw)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Compression ratio 0-14, maximum code width is ratio + 12 bits
    /// (other values fall back to 12 bits with a warning)
    #[arg(short, long, value_name = "RATIO", allow_hyphen_values = true)]
    ratio: Option<String>,

    /// Tag codes with their 8/12/16/20-bit width class
    #[arg(short, long)]
    binary: bool,

    /// Truncated binary code framing (must be given for both directions)
    #[arg(short, long)]
    truncated: bool,

    /// Reset the dictionary after this many codes (259..=2^(ratio+12))
    #[arg(long, value_name = "CODES")]
    table_max: Option<u32>,

    /// Overwrite an existing output file
    #[arg(short, long)]
    force: bool,

    /// Print debug output
    #[arg(long, conflicts_with = "quiet")]
    debug: bool,

    /// Only print warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Print the report as JSON (machine-readable)
    #[arg(long)]
    json: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }

    fn framing(&self) -> CodeFraming {
        if self.truncated {
            CodeFraming::TruncatedBinary
        } else {
            CodeFraming::Fixed
        }
    }

    fn show_progress(&self) -> bool {
        !(self.no_progress || self.json || self.quiet)
    }
}

fn main() {
    let cli = Cli::parse();
    logger::init(cli.log_level());

    let result = match (&cli.compress, &cli.decompress) {
        (Some(input), _) => {
            let base = match &cli.ratio {
                Some(arg) => LzwConfig::from_ratio_arg(arg),
                None => LzwConfig::default(),
            };
            let mut config = base
                .with_framing(cli.framing())
                .with_binary_mode(cli.binary);
            if let Some(table_max) = cli.table_max {
                config = config.with_table_max(table_max);
            }
            cmd_compress(&CompressOptions {
                input,
                output: cli.output.as_deref(),
                config,
                force: cli.force,
                progress: cli.show_progress(),
                json: cli.json,
            })
        }
        (None, Some(input)) => cmd_decompress(&DecompressOptions {
            input,
            output: cli.output.as_deref(),
            framing: cli.framing(),
            force: cli.force,
            progress: cli.show_progress(),
            json: cli.json,
        }),
        // clap enforces the mode group.
        (None, None) => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
