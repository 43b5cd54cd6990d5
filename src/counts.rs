//! Streaming parser for k-mer count files.
//!
//! A count file is the output of `jellyfish query`: one record per
//! line, two whitespace-separated fields (k-mer sequence, occurrence
//! count), in position order along the queried sequence. Line i is
//! position i.

use crate::error::{Result, ScanError};
use memchr::{memchr, memchr2};
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Minimum file size to use mmap (smaller files are read whole).
const MMAP_THRESHOLD: u64 = 64 * 1024;

/// One parsed count record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountRecord {
    pub kmer: String,
    pub count: u32,
}

/// Columnar form of a count stream.
///
/// K-mer strings are validated for uniform length while loading and
/// then dropped; the detector only needs the counts and the k-mer
/// length. `kmer_len` is 0 when the stream held no records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountTrack {
    pub counts: Vec<u32>,
    pub kmer_len: usize,
}

impl CountTrack {
    /// Build a track directly from counts and a k-mer length.
    pub fn new(counts: Vec<u32>, kmer_len: usize) -> Self {
        Self { counts, kmer_len }
    }

    /// Number of count positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if the stream held no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Split a line into k-mer and count fields.
///
/// Jellyfish separates the fields with a single space; tabs are
/// accepted as well.
#[inline]
fn split_fields(line: &[u8]) -> Option<(&[u8], &[u8])> {
    let sep = memchr2(b' ', b'\t', line)?;
    Some((&line[..sep], line[sep + 1..].trim_ascii()))
}

/// Parse an unsigned decimal count without allocation.
#[inline]
fn parse_count(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() {
        return None;
    }
    let mut value: u32 = 0;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value.checked_mul(10)?.checked_add((b - b'0') as u32)?;
    }
    Some(value)
}

/// Parse one trimmed, non-empty count line.
fn parse_line(line: &[u8], line_number: usize) -> Result<(&[u8], u32)> {
    let (kmer, count_field) = split_fields(line).ok_or_else(|| ScanError::Parse {
        line: line_number,
        message: "Expected two whitespace-separated fields".to_string(),
    })?;
    if kmer.is_empty() {
        return Err(ScanError::Parse {
            line: line_number,
            message: "Empty k-mer field".to_string(),
        });
    }
    let count = parse_count(count_field).ok_or_else(|| ScanError::Parse {
        line: line_number,
        message: format!(
            "Invalid count: {}",
            String::from_utf8_lossy(count_field)
        ),
    })?;
    Ok((kmer, count))
}

/// A streaming count-file reader.
///
/// Enforces the uniform k-mer length assumption: the first record
/// fixes the length and any later deviation is a fatal error.
pub struct CountReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    buffer: Vec<u8>,
    kmer_len: Option<usize>,
}

impl CountReader<File> {
    /// Open a count file from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> CountReader<R> {
    /// Create a reader from any readable source.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buffer: Vec::with_capacity(256),
            kmer_len: None,
        }
    }

    /// K-mer length seen so far, if any record has been read.
    pub fn kmer_len(&self) -> Option<usize> {
        self.kmer_len
    }

    /// Read the next record, keeping the k-mer sequence.
    pub fn read_record(&mut self) -> Result<Option<CountRecord>> {
        match self.next_parsed()? {
            Some((kmer, count)) => Ok(Some(CountRecord {
                kmer: String::from_utf8_lossy(&kmer).into_owned(),
                count,
            })),
            None => Ok(None),
        }
    }

    /// Read the next count, discarding the k-mer sequence.
    pub fn next_count(&mut self) -> Result<Option<u32>> {
        Ok(self.next_parsed()?.map(|(_, count)| count))
    }

    fn next_parsed(&mut self) -> Result<Option<(Vec<u8>, u32)>> {
        loop {
            self.buffer.clear();
            let bytes_read = self.reader.read_until(b'\n', &mut self.buffer)?;
            if bytes_read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buffer.trim_ascii();
            if line.is_empty() {
                continue;
            }

            let (kmer, count) = parse_line(line, self.line_number)?;
            let kmer = kmer.to_vec();
            self.check_kmer_len(kmer.len())?;
            return Ok(Some((kmer, count)));
        }
    }

    fn check_kmer_len(&mut self, found: usize) -> Result<()> {
        match self.kmer_len {
            None => {
                self.kmer_len = Some(found);
                Ok(())
            }
            Some(expected) if expected == found => Ok(()),
            Some(expected) => Err(ScanError::MixedKmerLength {
                line: self.line_number,
                expected,
                found,
            }),
        }
    }

    /// Iterate over all records.
    pub fn records(self) -> Records<R> {
        Records { reader: self }
    }
}

/// Iterator over count records.
pub struct Records<R: Read> {
    reader: CountReader<R>,
}

impl<R: Read> Iterator for Records<R> {
    type Item = Result<CountRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}

/// Parse a whole in-memory count file into a track.
pub fn track_from_bytes(data: &[u8]) -> Result<CountTrack> {
    let mut counts = Vec::new();
    let mut kmer_len: Option<usize> = None;
    let mut line_number = 0;
    let mut rest = data;

    while !rest.is_empty() {
        let (line, remainder) = match memchr(b'\n', rest) {
            Some(pos) => (&rest[..pos], &rest[pos + 1..]),
            None => (rest, &rest[rest.len()..]),
        };
        rest = remainder;
        line_number += 1;

        let line = line.trim_ascii();
        if line.is_empty() {
            continue;
        }

        let (kmer, count) = parse_line(line, line_number)?;
        match kmer_len {
            None => kmer_len = Some(kmer.len()),
            Some(expected) if expected == kmer.len() => {}
            Some(expected) => {
                return Err(ScanError::MixedKmerLength {
                    line: line_number,
                    expected,
                    found: kmer.len(),
                })
            }
        }
        counts.push(count);
    }

    Ok(CountTrack {
        counts,
        kmer_len: kmer_len.unwrap_or(0),
    })
}

/// Load a count track from a file.
///
/// Large files are memory-mapped; small ones are read whole. Genome
/// scale count files run to one line per nucleotide, so the zero-copy
/// path matters.
pub fn read_track<P: AsRef<Path>>(path: P) -> Result<CountTrack> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();

    if size >= MMAP_THRESHOLD {
        let mmap = unsafe { Mmap::map(&file)? };
        track_from_bytes(&mmap)
    } else {
        let mut data = Vec::with_capacity(size as usize);
        let mut reader = BufReader::new(file);
        reader.read_to_end(&mut data)?;
        track_from_bytes(&data)
    }
}

/// Load a count track from any reader (stdin support).
pub fn track_from_reader<R: Read>(reader: R) -> Result<CountTrack> {
    let mut reader = CountReader::new(reader);
    let mut counts = Vec::new();
    while let Some(count) = reader.next_count()? {
        counts.push(count);
    }
    Ok(CountTrack {
        counts,
        kmer_len: reader.kmer_len().unwrap_or(0),
    })
}
