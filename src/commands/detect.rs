//! Detect command implementation.
//!
//! The batch transformation at the heart of the tool: an ordered
//! k-mer count stream in, a minimal set of merged enriched regions
//! out. One call per count stream; nothing persists across runs.

use crate::bed::RegionWriter;
use crate::config::DetectParams;
use crate::counts::{read_track, track_from_reader, CountTrack};
use crate::error::Result;
use crate::genome::Genome;
use crate::regions::{collapse_runs, merge_regions, CoordinateMap, Region};
use crate::window::{passing_windows, success_bits, SlidingSums};
use std::fmt;
use std::io::{self, Write};
use std::path::Path;

/// Counters from one detection run.
#[derive(Debug, Default, Clone)]
pub struct DetectStats {
    pub records: usize,
    pub kmer_len: usize,
    pub passing_windows: usize,
    pub runs: usize,
    pub regions: usize,
}

impl fmt::Display for DetectStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Records: {}, K: {}, Passing windows: {}, Runs: {}, Regions: {}",
            self.records, self.kmer_len, self.passing_windows, self.runs, self.regions
        )
    }
}

/// Detect command configuration.
#[derive(Debug, Clone)]
pub struct DetectCommand {
    /// Detection parameters, validated before any computation.
    pub params: DetectParams,
    /// Emit a fourth column with the region's peak window density.
    pub density: bool,
    /// Chromosome sizes for clamping region ends, if provided.
    pub genome: Option<Genome>,
}

impl DetectCommand {
    pub fn new(params: DetectParams) -> Self {
        Self {
            params,
            density: false,
            genome: None,
        }
    }

    /// Enable the density column.
    pub fn with_density(mut self, density: bool) -> Self {
        self.density = density;
        self
    }

    /// Clamp region ends against a chromosome-sizes table.
    pub fn with_genome(mut self, genome: Genome) -> Self {
        self.genome = Some(genome);
        self
    }

    /// Run the detector over a loaded count track.
    pub fn detect(&self, track: &CountTrack) -> Result<Vec<Region>> {
        Ok(self.detect_with_stats(track)?.0)
    }

    /// Run the detector, also returning stage counters.
    pub fn detect_with_stats(&self, track: &CountTrack) -> Result<(Vec<Region>, DetectStats)> {
        self.params.validate()?;

        let mut stats = DetectStats {
            records: track.len(),
            kmer_len: track.kmer_len,
            ..DetectStats::default()
        };

        // No window fits: zero regions found, not a failure.
        if track.len() < self.params.span {
            return Ok((Vec::new(), stats));
        }

        let bits = success_bits(&track.counts, self.params.threshold);
        let sums = SlidingSums::new(&bits, self.params.span);
        let passing = passing_windows(sums, self.params.span, self.params.composition);
        stats.passing_windows = passing.len();

        let runs = collapse_runs(&passing);
        stats.runs = runs.len();

        let map = CoordinateMap {
            span: self.params.span,
            kmer_len: track.kmer_len,
            offset: self.params.start,
        };
        let mut regions = merge_regions(map.map_runs(&runs));

        if let Some(size) = self
            .genome
            .as_ref()
            .and_then(|g| g.chrom_size(&self.params.chrom))
        {
            regions.retain(|r| r.start < size);
            for region in &mut regions {
                region.end = region.end.min(size);
            }
        }

        stats.regions = regions.len();
        Ok((regions, stats))
    }

    /// Write regions as BED rows.
    pub fn write_regions<W: Write>(&self, regions: &[Region], output: W) -> Result<()> {
        let mut writer = RegionWriter::new(output);
        for region in regions {
            if self.density {
                writer.write_region_with_density(&self.params.chrom, region, self.params.span)?;
            } else {
                writer.write_region(&self.params.chrom, region)?;
            }
        }
        writer.flush()
    }

    /// Execute on a count file, writing BED rows to `output`.
    pub fn run<P: AsRef<Path>, W: Write>(&self, input: P, output: &mut W) -> Result<DetectStats> {
        let track = read_track(input)?;
        self.run_track(&track, output)
    }

    /// Execute on counts read from stdin.
    pub fn run_stdin<W: Write>(&self, output: &mut W) -> Result<DetectStats> {
        let track = track_from_reader(io::stdin().lock())?;
        self.run_track(&track, output)
    }

    fn run_track<W: Write>(&self, track: &CountTrack, output: &mut W) -> Result<DetectStats> {
        let (regions, stats) = self.detect_with_stats(track)?;
        self.write_regions(&regions, output)?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(span: usize, threshold: u32, composition: f64) -> DetectCommand {
        DetectCommand::new(
            DetectParams::new("chrT")
                .with_span(span)
                .with_threshold(threshold)
                .with_composition(composition),
        )
    }

    #[test]
    fn test_scenario_no_qualifying_regions() {
        // counts all zero: no window can pass.
        let track = CountTrack::new(vec![0, 0, 0, 0, 0], 4);
        let (regions, stats) = command(2, 1, 0.5).detect_with_stats(&track).unwrap();
        assert!(regions.is_empty());
        assert_eq!(stats.passing_windows, 0);
        assert_eq!(stats.runs, 0);
    }

    #[test]
    fn test_scenario_single_region() {
        let track = CountTrack::new(vec![1, 6, 7, 2], 4);
        let regions = command(2, 5, 1.0).detect(&track).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!((regions[0].start, regions[0].end), (1, 6));
    }

    #[test]
    fn test_scenario_two_runs_merge_into_one() {
        // Two non-contiguous passing windows whose mapped intervals
        // overlap after span and k-mer extension.
        let track = CountTrack::new(vec![0, 2, 3, 4, 0, 0, 5, 6, 7, 0], 4);
        let (regions, stats) = command(3, 1, 1.0).detect_with_stats(&track).unwrap();
        assert_eq!(stats.passing_windows, 2);
        assert_eq!(stats.runs, 2);
        assert_eq!(regions.len(), 1);
        assert_eq!((regions[0].start, regions[0].end), (1, 12));
    }

    #[test]
    fn test_empty_track() {
        let track = CountTrack::default();
        let regions = command(3, 1, 0.5).detect(&track).unwrap();
        assert!(regions.is_empty());
    }

    #[test]
    fn test_span_larger_than_input() {
        let track = CountTrack::new(vec![100, 100, 100], 4);
        let regions = command(4, 1, 0.0).detect(&track).unwrap();
        assert!(regions.is_empty());
    }

    #[test]
    fn test_invalid_params_rejected_before_compute() {
        let track = CountTrack::new(vec![1], 4);
        assert!(command(0, 1, 0.5).detect(&track).is_err());
        assert!(command(2, 1, 1.5).detect(&track).is_err());
    }

    #[test]
    fn test_start_offset_shifts_output() {
        let track = CountTrack::new(vec![1, 6, 7, 2], 4);
        let mut cmd = command(2, 5, 1.0);
        cmd.params.start = 500;
        let regions = cmd.detect(&track).unwrap();
        assert_eq!((regions[0].start, regions[0].end), (501, 506));
    }

    #[test]
    fn test_genome_clamps_region_end() {
        let track = CountTrack::new(vec![9, 9, 9, 9], 4);
        let mut genome = Genome::new();
        genome.insert("chrT".to_string(), 6);
        let cmd = command(2, 5, 1.0).with_genome(genome);
        let regions = cmd.detect(&track).unwrap();
        // Unclamped end would be 0 + 2 - 1 + 4 ... last run end 2 -> 7.
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].end, 6);
    }

    #[test]
    fn test_bed_output_format() {
        let track = CountTrack::new(vec![0, 2, 3, 4, 0, 0, 5, 6, 7, 0], 4);
        let cmd = command(3, 1, 1.0);
        let (regions, _) = cmd.detect_with_stats(&track).unwrap();
        let mut out = Vec::new();
        cmd.write_regions(&regions, &mut out).unwrap();
        assert_eq!(out, b"chrT\t1\t12\n");
    }

    #[test]
    fn test_density_column() {
        let track = CountTrack::new(vec![1, 6, 7, 2], 4);
        let cmd = command(2, 5, 1.0).with_density(true);
        let (regions, _) = cmd.detect_with_stats(&track).unwrap();
        let mut out = Vec::new();
        cmd.write_regions(&regions, &mut out).unwrap();
        assert_eq!(out, b"chrT\t1\t6\t1.0\n");
    }
}
