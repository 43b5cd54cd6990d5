//! Detector configuration.
//!
//! One explicit parameter object per run; nothing is process-global.

use crate::error::{Result, ScanError};

/// Default sliding window width, in k-mer positions.
pub const DEFAULT_SPAN: usize = 3000;

/// Default minimum count for a position to count as successful.
pub const DEFAULT_THRESHOLD: u32 = 10;

/// Default minimum fraction of successful positions within a window.
pub const DEFAULT_COMPOSITION: f64 = 0.5;

/// Parameters for one enriched-region detection run.
///
/// `start` is the 0-based nucleotide position, within `chrom`, of the
/// first base of the k-mer at count index 0. It stays 0 unless the
/// count stream covers a sub-region of a larger scaffold.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectParams {
    /// Chromosome or scaffold label attached to every output region.
    pub chrom: String,
    /// Sliding window width, in k-mer positions.
    pub span: usize,
    /// Minimum count for a position to be marked successful.
    pub threshold: u32,
    /// Minimum fraction of successful positions in a window, in [0, 1].
    pub composition: f64,
    /// Nucleotide offset of count index 0 within the chromosome.
    pub start: u64,
}

impl DetectParams {
    /// Create parameters with the published defaults.
    pub fn new(chrom: impl Into<String>) -> Self {
        Self {
            chrom: chrom.into(),
            span: DEFAULT_SPAN,
            threshold: DEFAULT_THRESHOLD,
            composition: DEFAULT_COMPOSITION,
            start: 0,
        }
    }

    /// Set the window span.
    pub fn with_span(mut self, span: usize) -> Self {
        self.span = span;
        self
    }

    /// Set the success threshold.
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the composition fraction.
    pub fn with_composition(mut self, composition: f64) -> Self {
        self.composition = composition;
        self
    }

    /// Set the global start offset.
    pub fn with_start(mut self, start: u64) -> Self {
        self.start = start;
        self
    }

    /// Reject parameter values before any computation begins.
    ///
    /// The threshold needs no check: counts are unsigned, so every
    /// threshold value is a valid one.
    pub fn validate(&self) -> Result<()> {
        if self.span < 1 {
            return Err(ScanError::InvalidSpan(self.span));
        }
        if !self.composition.is_finite() || !(0.0..=1.0).contains(&self.composition) {
            return Err(ScanError::InvalidComposition(self.composition));
        }
        Ok(())
    }
}
