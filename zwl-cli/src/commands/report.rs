//! Session report, printed for humans or as JSON.

use crate::utils::{format_duration, format_size, throughput};
use serde::{Deserialize, Serialize};
use std::path::Path;
use zwl_lzw::CodecReport;

/// JSON serializable summary of one run.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportJson {
    operation: String,
    input: String,
    output: String,
    bytes_in: u64,
    bytes_out: u64,
    /// Compressed size as a percentage of the uncompressed size.
    ratio: f64,
    codes: u64,
    resets: u64,
    code_max_bits: u8,
    framing: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    binary_mode: Option<bool>,
    elapsed_secs: f64,
    throughput_mib_s: f64,
}

impl ReportJson {
    pub fn new(
        compressing: bool,
        input: &Path,
        output: &Path,
        report: &CodecReport,
        framing: &str,
        binary_mode: Option<bool>,
    ) -> Self {
        let raw = if compressing {
            report.bytes_in
        } else {
            report.bytes_out
        };
        Self {
            operation: if compressing { "compress" } else { "decompress" }.to_string(),
            input: input.display().to_string(),
            output: output.display().to_string(),
            bytes_in: report.bytes_in,
            bytes_out: report.bytes_out,
            ratio: report.ratio_percent(compressing),
            codes: report.codes,
            resets: report.resets,
            code_max_bits: report.code_max_bits,
            framing: framing.to_string(),
            binary_mode,
            elapsed_secs: report.elapsed.as_secs_f64(),
            throughput_mib_s: throughput(raw, report.elapsed),
        }
    }

    /// Print as pretty JSON on stdout.
    pub fn print_json(&self) -> Result<(), serde_json::Error> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }

    /// Print a short human-readable summary on stdout.
    pub fn print_human(&self, report: &CodecReport) {
        println!("{} -> {}", self.input, self.output);
        println!(
            "  {} -> {} ({:.1}%)",
            format_size(self.bytes_in),
            format_size(self.bytes_out),
            self.ratio
        );
        println!(
            "  {} codes, {} resets, {}-bit codes, {} framing",
            self.codes, self.resets, self.code_max_bits, self.framing
        );
        println!(
            "  {} ({:.2} MiB/s)",
            format_duration(report.elapsed),
            self.throughput_mib_s
        );
    }
}
