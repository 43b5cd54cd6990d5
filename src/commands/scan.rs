//! Scan command implementation.
//!
//! End-to-end pipeline: query FASTA + jellyfish index in, BED of
//! enriched regions plus their extracted sequences out. Counting and
//! extraction are delegated to jellyfish and bedtools; only the
//! detection in between is ours.

use crate::commands::detect::{DetectCommand, DetectStats};
use crate::counts::read_track;
use crate::error::Result;
use crate::external;
use crate::fasta;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Counters from one scan run.
#[derive(Debug, Default, Clone)]
pub struct ScanStats {
    pub query_id: String,
    pub query_length: usize,
    pub detect: DetectStats,
}

impl fmt::Display for ScanStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Query: {} ({} bp), {}",
            self.query_id, self.query_length, self.detect
        )
    }
}

/// Scan command configuration.
#[derive(Debug, Clone)]
pub struct ScanCommand {
    /// Detection settings shared with the standalone detect command.
    pub detect: DetectCommand,
    /// Path to the jellyfish binary.
    pub jellyfish: PathBuf,
    /// Path to the bedtools binary.
    pub bedtools: PathBuf,
    /// Keep the intermediate count file next to the BED output
    /// instead of using a temporary file.
    pub keep_counts: bool,
}

impl ScanCommand {
    pub fn new(detect: DetectCommand) -> Self {
        Self {
            detect,
            jellyfish: PathBuf::from("jellyfish"),
            bedtools: PathBuf::from("bedtools"),
            keep_counts: false,
        }
    }

    /// Run the whole pipeline.
    ///
    /// `query_fa` is the single-scaffold FASTA to be scanned,
    /// `jf_index` the pre-built jellyfish index of the genome,
    /// `scaffold_fa` the reference FASTA handed to bedtools for
    /// sequence extraction.
    pub fn run(
        &self,
        query_fa: &Path,
        jf_index: &Path,
        scaffold_fa: &Path,
        bed_out: &Path,
        fasta_out: &Path,
    ) -> Result<ScanStats> {
        // Reject bad parameters before spawning anything.
        self.detect.params.validate()?;

        let query = fasta::inspect_single(query_fa)?;

        let out_dir = match bed_out.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp_guard = None;
        let counts_path = if self.keep_counts {
            out_dir.join(format!("{}_counts.txt", self.detect.params.chrom))
        } else {
            let tmp = tempfile::Builder::new()
                .prefix("kerscan_counts_")
                .suffix(".txt")
                .tempfile_in(out_dir)?;
            let path = tmp.path().to_path_buf();
            tmp_guard = Some(tmp);
            path
        };

        external::jellyfish_query(&self.jellyfish, jf_index, query_fa, &counts_path)?;

        let track = read_track(&counts_path)?;
        drop(tmp_guard);

        // The counter may drop N-containing k-mers, so the stream
        // stays authoritative; still worth flagging a length mismatch.
        if track.kmer_len > 0 && query.length >= track.kmer_len {
            let expected = query.length - track.kmer_len + 1;
            if track.len() != expected {
                eprintln!(
                    "Warning: {} count records for a {} bp query (expected {})",
                    track.len(),
                    query.length,
                    expected
                );
            }
        }

        let mut bed_file = File::create(bed_out)?;
        let (regions, detect_stats) = self.detect.detect_with_stats(&track)?;
        self.detect.write_regions(&regions, &mut bed_file)?;

        external::bedtools_getfasta(&self.bedtools, scaffold_fa, bed_out, fasta_out)?;

        Ok(ScanStats {
            query_id: query.id,
            query_length: query.length,
            detect: detect_stats,
        })
    }
}
