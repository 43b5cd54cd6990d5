//! Generate synthetic count streams for benchmarks and tests.
//!
//! Produces files in the jellyfish `query` output format: background
//! positions draw counts below the enrichment threshold, with planted
//! blocks of elevated counts at regular intervals. Deterministic for
//! a given seed.

use crate::error::{Result, ScanError};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Buffer size for generated output (8MB).
const BUF_SIZE: usize = 8 * 1024 * 1024;

const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Position count specification (parses 1K, 1M, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeSpec {
    pub count: u64,
}

impl SizeSpec {
    /// Parse a size from a string (e.g. "1K", "5M", "100").
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_uppercase();
        if s.is_empty() {
            return None;
        }
        let (digits, multiplier) = match s.as_bytes()[s.len() - 1] {
            b'K' => (&s[..s.len() - 1], 1_000),
            b'M' => (&s[..s.len() - 1], 1_000_000),
            _ => (s.as_str(), 1),
        };
        let value: u64 = digits.parse().ok()?;
        Some(Self {
            count: value * multiplier,
        })
    }

    /// Human label used in output file names.
    pub fn label(&self) -> String {
        if self.count >= 1_000_000 && self.count % 1_000_000 == 0 {
            format!("{}M", self.count / 1_000_000)
        } else if self.count >= 1_000 && self.count % 1_000 == 0 {
            format!("{}K", self.count / 1_000)
        } else {
            self.count.to_string()
        }
    }
}

/// Generator configuration.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Output directory (created if missing).
    pub output: PathBuf,
    /// One file is written per requested size.
    pub sizes: Vec<SizeSpec>,
    /// Seed for reproducibility.
    pub seed: u64,
    /// K-mer length of the synthetic records.
    pub kmer_len: usize,
    /// Background counts are drawn from 0..=background_max.
    pub background_max: u32,
    /// Count planted inside enriched blocks.
    pub enriched_count: u32,
    /// Length of each enriched block, in positions.
    pub block_len: usize,
    /// One block starts every `block_every` positions.
    pub block_every: usize,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("./kerscan_bench_data"),
            sizes: vec![SizeSpec { count: 1_000_000 }],
            seed: 42,
            kmer_len: 18,
            background_max: 9,
            enriched_count: 50,
            block_len: 5_000,
            block_every: 50_000,
        }
    }
}

/// Statistics from a generation run.
#[derive(Debug, Default, Clone)]
pub struct GenerateStats {
    pub files: usize,
    pub positions: u64,
}

impl std::fmt::Display for GenerateStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Files: {}, Positions: {}", self.files, self.positions)
    }
}

/// Generate command.
#[derive(Debug, Clone)]
pub struct GenerateCommand {
    pub config: GenerateConfig,
}

impl GenerateCommand {
    pub fn new(config: GenerateConfig) -> Self {
        Self { config }
    }

    /// Write one count file per requested size, in parallel.
    pub fn run(&self) -> Result<GenerateStats> {
        if self.config.kmer_len == 0 {
            return Err(ScanError::InvalidFormat(
                "kmer-len must be at least 1".to_string(),
            ));
        }
        if self.config.block_every == 0 {
            return Err(ScanError::InvalidFormat(
                "block-every must be at least 1".to_string(),
            ));
        }
        fs::create_dir_all(&self.config.output)?;

        let written: Vec<Result<u64>> = self
            .config
            .sizes
            .par_iter()
            .enumerate()
            .map(|(i, spec)| self.write_file(*spec, self.config.seed.wrapping_add(i as u64)))
            .collect();

        let mut stats = GenerateStats::default();
        for result in written {
            stats.positions += result?;
            stats.files += 1;
        }
        Ok(stats)
    }

    /// Path of the file generated for a size spec.
    pub fn file_path(&self, spec: SizeSpec) -> PathBuf {
        self.config.output.join(format!("counts_{}.txt", spec.label()))
    }

    fn write_file(&self, spec: SizeSpec, seed: u64) -> Result<u64> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let file = File::create(self.file_path(spec))?;
        let mut writer = BufWriter::with_capacity(BUF_SIZE, file);
        let mut itoa_buf = itoa::Buffer::new();
        let mut kmer = vec![0u8; self.config.kmer_len];

        for position in 0..spec.count {
            for base in kmer.iter_mut() {
                *base = BASES[rng.gen_range(0..4)];
            }
            let in_block = (position as usize % self.config.block_every) < self.config.block_len;
            let count = if in_block {
                self.config.enriched_count
            } else {
                rng.gen_range(0..=self.config.background_max)
            };

            writer.write_all(&kmer)?;
            writer.write_all(b" ")?;
            writer.write_all(itoa_buf.format(count).as_bytes())?;
            writer.write_all(b"\n")?;
        }

        writer.flush()?;
        Ok(spec.count)
    }
}
