//! Query-FASTA inspection.
//!
//! The scan pipeline needs just enough FASTA awareness to validate its
//! input: the record id and sequence length of the single scaffold
//! being queried. Sequence extraction itself is bedtools' job.

use crate::error::{Result, ScanError};
use needletail::parse_fastx_file;
use std::path::Path;

/// Id and length of one FASTA record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecordInfo {
    pub id: String,
    pub length: usize,
}

/// Read record ids and lengths from a FASTA file.
pub fn inspect<P: AsRef<Path>>(path: P) -> Result<Vec<FastaRecordInfo>> {
    let path = path.as_ref();
    let mut reader = parse_fastx_file(path).map_err(|e| ScanError::Fasta {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut records = Vec::new();
    while let Some(result) = reader.next() {
        let record = result.map_err(|e| ScanError::Fasta {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let id = String::from_utf8_lossy(record.id())
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        records.push(FastaRecordInfo {
            id,
            length: record.seq().len(),
        });
    }

    Ok(records)
}

/// Inspect a query FASTA that must hold exactly one scaffold.
pub fn inspect_single<P: AsRef<Path>>(path: P) -> Result<FastaRecordInfo> {
    let path = path.as_ref();
    let records = inspect(path)?;
    match records.len() {
        0 => Err(ScanError::EmptyQuery(path.to_path_buf())),
        1 => Ok(records.into_iter().next().unwrap()),
        n => Err(ScanError::MultiRecordQuery {
            path: path.to_path_buf(),
            records: n,
        }),
    }
}
