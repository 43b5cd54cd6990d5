//! Invocation of the external counting and extraction tools.
//!
//! The pipeline shells out twice: `jellyfish query` produces the
//! per-position count stream, and `bedtools getfasta` extracts the
//! detected regions. A failed spawn or non-zero exit aborts the run;
//! output files are never parsed unless the tool exited cleanly.

use crate::error::{Result, ScanError};
use std::path::Path;
use std::process::{Command, Stdio};

/// Run `jellyfish query <index> -s <query> -o <out>`.
pub fn jellyfish_query(bin: &Path, index: &Path, query: &Path, out: &Path) -> Result<()> {
    let mut command = Command::new(bin);
    command
        .arg("query")
        .arg(index)
        .arg("-s")
        .arg(query)
        .arg("-o")
        .arg(out)
        .stdin(Stdio::null());
    run_checked(command, "jellyfish")
}

/// Run `bedtools getfasta -fi <genome> -bed <bed> -fo <out>`.
pub fn bedtools_getfasta(bin: &Path, genome_fa: &Path, bed: &Path, out: &Path) -> Result<()> {
    let mut command = Command::new(bin);
    command
        .arg("getfasta")
        .arg("-fi")
        .arg(genome_fa)
        .arg("-bed")
        .arg(bed)
        .arg("-fo")
        .arg(out)
        .stdin(Stdio::null());
    run_checked(command, "bedtools")
}

fn run_checked(mut command: Command, tool: &'static str) -> Result<()> {
    let status = command
        .status()
        .map_err(|source| ScanError::ToolLaunch { tool, source })?;
    if !status.success() {
        return Err(ScanError::ToolFailed { tool, status });
    }
    Ok(())
}
