//! Compress command implementation.

use super::report::ReportJson;
use super::{CmdResult, check_input, check_output};
use crate::utils::{compressed_name, create_progress_bar};
use std::path::Path;
use zwl_core::probe;
use zwl_lzw::{LzwConfig, compress_file_with};

/// Options for compressing one file.
pub struct CompressOptions<'a> {
    pub input: &'a Path,
    pub output: Option<&'a Path>,
    pub config: LzwConfig,
    pub force: bool,
    pub progress: bool,
    pub json: bool,
}

pub fn cmd_compress(opts: &CompressOptions) -> CmdResult {
    let size = check_input(opts.input)?;
    if size == 0 {
        return Err(format!("\"{}\" is empty, nothing to compress", opts.input.display()).into());
    }

    let output = opts
        .output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| compressed_name(opts.input));
    if output == opts.input || probe::same_file(&output, opts.input) {
        return Err("input and output are the same file".into());
    }
    check_output(&output, opts.force)?;
    opts.config.validate()?;

    let pb = create_progress_bar(size, opts.progress);
    pb.set_message("compressing");
    let result = compress_file_with(opts.input, &output, opts.config, |n| pb.set_position(n));
    pb.finish_and_clear();
    let report = result?;

    let json = ReportJson::new(
        true,
        opts.input,
        &output,
        &report,
        opts.config.framing.name(),
        Some(opts.config.binary_mode),
    );
    if opts.json {
        json.print_json()?;
    } else {
        log::debug!("{:?}", report);
        json.print_human(&report);
    }
    Ok(())
}
