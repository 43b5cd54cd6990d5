//! Chromosome-sizes table.
//!
//! Parses .genome files (tab-delimited: chrom\tsize). Used to clamp
//! region ends to the chromosome boundary so downstream extraction
//! tools never see coordinates past the sequence end.

use crate::error::{Result, ScanError};
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Chromosome name to size mapping.
#[derive(Debug, Clone, Default)]
pub struct Genome {
    sizes: FxHashMap<String, u64>,
}

impl Genome {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a two-column file, skipping blanks and `#` comments.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut genome = Self::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split('\t');
            let chrom = fields.next().unwrap_or_default();
            let size_field = fields.next().ok_or_else(|| ScanError::Parse {
                line: line_num + 1,
                message: "Genome file requires two columns: chrom and size".to_string(),
            })?;
            let size: u64 = size_field.parse().map_err(|_| ScanError::Parse {
                line: line_num + 1,
                message: format!("Invalid chromosome size: {size_field}"),
            })?;

            genome.insert(chrom.to_string(), size);
        }

        Ok(genome)
    }

    /// Insert or replace a chromosome size.
    pub fn insert(&mut self, chrom: String, size: u64) {
        self.sizes.insert(chrom, size);
    }

    /// Size of a chromosome, if known.
    #[inline]
    pub fn chrom_size(&self, chrom: &str) -> Option<u64> {
        self.sizes.get(chrom).copied()
    }

    /// Number of chromosomes in the table.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// True if no chromosomes are loaded.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}
