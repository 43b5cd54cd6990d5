//! Error types shared across the pipeline.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors that can occur while scanning for enriched regions.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("k-mer length changed at line {line}: expected {expected}, found {found}")]
    MixedKmerLength {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid span {0}: must be at least 1")]
    InvalidSpan(usize),

    #[error("Invalid composition {0}: must be within [0, 1]")]
    InvalidComposition(f64),

    #[error("Failed to launch {tool}: {source}")]
    ToolLaunch {
        tool: &'static str,
        source: io::Error,
    },

    #[error("{tool} exited with {status}")]
    ToolFailed {
        tool: &'static str,
        status: ExitStatus,
    },

    #[error("No sequences found in query FASTA {}", .0.display())]
    EmptyQuery(PathBuf),

    #[error(
        "Query FASTA {} holds {records} sequences; one scaffold per run is required",
        path.display()
    )]
    MultiRecordQuery { path: PathBuf, records: usize },

    #[error("Invalid FASTA {}: {message}", path.display())]
    Fasta { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_offending_values() {
        let e = ScanError::InvalidSpan(0);
        assert!(e.to_string().contains('0'));

        let e = ScanError::InvalidComposition(1.5);
        assert!(e.to_string().contains("1.5"));

        let e = ScanError::MixedKmerLength {
            line: 42,
            expected: 18,
            found: 17,
        };
        let msg = e.to_string();
        assert!(msg.contains("42") && msg.contains("18") && msg.contains("17"));
    }
}
