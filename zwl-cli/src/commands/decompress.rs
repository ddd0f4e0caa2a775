//! Decompress command implementation.

use super::report::ReportJson;
use super::{CmdResult, check_input, check_output};
use crate::utils::{create_progress_bar, decompressed_name};
use std::path::Path;
use zwl_core::probe;
use zwl_lzw::{CodeFraming, ErrorKind, decompress_file_with};

/// Options for decompressing one file.
pub struct DecompressOptions<'a> {
    pub input: &'a Path,
    pub output: Option<&'a Path>,
    pub framing: CodeFraming,
    pub force: bool,
    pub progress: bool,
    pub json: bool,
}

pub fn cmd_decompress(opts: &DecompressOptions) -> CmdResult {
    let size = check_input(opts.input)?;

    let output = opts
        .output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| decompressed_name(opts.input));
    if output == opts.input || probe::same_file(&output, opts.input) {
        return Err("input and output are the same file".into());
    }
    check_output(&output, opts.force)?;

    let pb = create_progress_bar(size, opts.progress);
    pb.set_message("decompressing");
    let result = decompress_file_with(opts.input, &output, opts.framing, |n| pb.set_position(n));
    pb.finish_and_clear();
    let report = match result {
        Ok(report) => report,
        Err(e) if e.kind() == ErrorKind::InvalidFormat => {
            return Err(format!(
                "\"{}\" doesn't seem to be a valid LZW file: {}",
                opts.input.display(),
                e
            )
            .into());
        }
        Err(e) => return Err(e.into()),
    };

    let json = ReportJson::new(
        false,
        opts.input,
        &output,
        &report,
        opts.framing.name(),
        None,
    );
    if opts.json {
        json.print_json()?;
    } else {
        log::debug!("{:?}", report);
        json.print_human(&report);
    }
    Ok(())
}
