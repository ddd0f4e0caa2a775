//! Command implementations for the ZWL CLI.

pub mod compress;
pub mod decompress;
mod report;

pub use compress::{CompressOptions, cmd_compress};
pub use decompress::{DecompressOptions, cmd_decompress};

use std::path::Path;
use zwl_core::probe;

/// Error type shared by the commands.
pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Refuse to clobber `output` unless `force` is set.
fn check_output(output: &Path, force: bool) -> Result<(), String> {
    if probe::exists(output) && !force {
        return Err(format!(
            "\"{}\" already exists, use --force to overwrite",
            output.display()
        ));
    }
    Ok(())
}

/// Require `input` to be an existing regular file.
fn check_input(input: &Path) -> Result<u64, Box<dyn std::error::Error>> {
    if !probe::exists(input) {
        return Err(format!("\"{}\" not found", input.display()).into());
    }
    Ok(probe::size(input)?)
}
