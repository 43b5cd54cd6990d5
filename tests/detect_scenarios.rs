//! End-to-end detection tests over real count files.

use kerscan::commands::DetectCommand;
use kerscan::config::DetectParams;
use kerscan::counts::read_track;
use kerscan::error::ScanError;
use std::io::Write;
use tempfile::NamedTempFile;

fn count_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

fn command(span: usize, threshold: u32, composition: f64) -> DetectCommand {
    DetectCommand::new(
        DetectParams::new("chr9")
            .with_span(span)
            .with_threshold(threshold)
            .with_composition(composition),
    )
}

#[test]
fn no_qualifying_regions_yield_empty_bed() {
    let file = count_file("AAAA 0\nAAAC 0\nAAAG 0\nAAAT 0\nAACA 0\n");
    let mut out = Vec::new();
    let stats = command(2, 1, 0.5).run(file.path(), &mut out).unwrap();
    assert!(out.is_empty());
    assert_eq!(stats.records, 5);
    assert_eq!(stats.passing_windows, 0);
    assert_eq!(stats.regions, 0);
}

#[test]
fn single_window_region() {
    let file = count_file("CGTA 1\nGTAC 6\nTACG 7\nACGT 2\n");
    let mut out = Vec::new();
    let stats = command(2, 5, 1.0).run(file.path(), &mut out).unwrap();
    assert_eq!(out, b"chr9\t1\t6\n");
    assert_eq!(stats.passing_windows, 1);
    assert_eq!(stats.runs, 1);
    assert_eq!(stats.regions, 1);
}

#[test]
fn separate_runs_merge_after_extension() {
    // Two non-contiguous passing windows, one merged output region.
    let file = count_file(
        "AAAA 0\nAAAC 2\nAAAG 3\nAAAT 4\nAACA 0\nAACC 0\nAACG 5\nAACT 6\nAAGA 7\nAAGC 0\n",
    );
    let mut out = Vec::new();
    let stats = command(3, 1, 1.0).run(file.path(), &mut out).unwrap();
    assert_eq!(stats.runs, 2);
    assert_eq!(stats.regions, 1);
    assert_eq!(out, b"chr9\t1\t12\n");
}

#[test]
fn span_exceeding_record_count_is_not_an_error() {
    let file = count_file("AAAA 50\nAAAC 50\n");
    let mut out = Vec::new();
    let stats = command(10, 1, 0.5).run(file.path(), &mut out).unwrap();
    assert!(out.is_empty());
    assert_eq!(stats.records, 2);
}

#[test]
fn empty_count_file_is_not_an_error() {
    let file = count_file("");
    let mut out = Vec::new();
    let stats = command(3, 1, 0.5).run(file.path(), &mut out).unwrap();
    assert!(out.is_empty());
    assert_eq!(stats.records, 0);
}

#[test]
fn mixed_kmer_lengths_abort_the_run() {
    let file = count_file("AAAA 1\nAAACA 2\n");
    let mut out = Vec::new();
    let err = command(1, 1, 0.5).run(file.path(), &mut out).unwrap_err();
    assert!(matches!(err, ScanError::MixedKmerLength { line: 2, .. }));
}

#[test]
fn large_file_takes_the_mmap_path() {
    // Above the 64KB mmap threshold: 6000 records of ~21 bytes.
    let mut content = String::new();
    for i in 0..6000 {
        let count = if (1000..2000).contains(&i) { 40 } else { 0 };
        content.push_str(&format!("ACGTACGTACGTACGTAA {}\n", count));
    }
    let file = count_file(&content);

    let track = read_track(file.path()).unwrap();
    assert_eq!(track.len(), 6000);
    assert_eq!(track.kmer_len, 18);

    let regions = command(100, 10, 0.9).detect(&track).unwrap();
    assert_eq!(regions.len(), 1);
    // The enriched block spans positions 1000..2000. Windows starting
    // at 990..=1910 carry at least 90 successes; the run maps to
    // start 990 and end 1910 + 100 - 1 + 18.
    assert_eq!((regions[0].start, regions[0].end), (990, 2027));
}

#[test]
fn rerunning_detection_is_deterministic() {
    let file = count_file("CGTA 1\nGTAC 6\nTACG 7\nACGT 2\n");
    let cmd = command(2, 5, 1.0);
    let mut first = Vec::new();
    let mut second = Vec::new();
    cmd.run(file.path(), &mut first).unwrap();
    cmd.run(file.path(), &mut second).unwrap();
    assert_eq!(first, second);
}

#[test]
fn region_count_never_grows_with_threshold() {
    let mut content = String::new();
    for i in 0..200u32 {
        content.push_str(&format!("ACGTA {}\n", (i * 7) % 23));
    }
    let file = count_file(&content);
    let track = read_track(file.path()).unwrap();

    let mut prev_windows = usize::MAX;
    for threshold in 0..24 {
        let cmd = command(10, threshold, 0.5);
        let (_, stats) = cmd.detect_with_stats(&track).unwrap();
        assert!(
            stats.passing_windows <= prev_windows,
            "threshold {} increased passing windows",
            threshold
        );
        prev_windows = stats.passing_windows;
    }
}
