//! BED output for detected regions.
//!
//! Uses itoa for coordinates and ryu for the optional density column
//! to avoid allocation in the output loop.

use crate::error::Result;
use crate::regions::Region;
use std::io::{BufWriter, Write};

/// Buffer size for region output (256KB).
const DEFAULT_BUFFER_SIZE: usize = 256 * 1024;

/// Buffered writer for region rows.
///
/// Default output is BED3 (`chrom\tstart\tend`); an optional fourth
/// column reports the region's peak window density.
pub struct RegionWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
    ryu_buf: ryu::Buffer,
}

impl<W: Write> RegionWriter<W> {
    /// Create a writer with the default buffer size.
    pub fn new(output: W) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, output)
    }

    /// Create a writer with a specific buffer size.
    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            itoa_buf: itoa::Buffer::new(),
            ryu_buf: ryu::Buffer::new(),
        }
    }

    /// Write one BED3 row.
    #[inline]
    pub fn write_region(&mut self, chrom: &str, region: &Region) -> Result<()> {
        self.write_coords(chrom, region)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Write one row with a density column: `peak / span`.
    #[inline]
    pub fn write_region_with_density(
        &mut self,
        chrom: &str,
        region: &Region,
        span: usize,
    ) -> Result<()> {
        self.write_coords(chrom, region)?;
        let density = f64::from(region.peak) / span as f64;
        self.writer.write_all(b"\t")?;
        self.writer
            .write_all(self.ryu_buf.format(density).as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    #[inline]
    fn write_coords(&mut self, chrom: &str, region: &Region) -> Result<()> {
        self.writer.write_all(chrom.as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer
            .write_all(self.itoa_buf.format(region.start).as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer
            .write_all(self.itoa_buf.format(region.end).as_bytes())?;
        Ok(())
    }

    /// Flush buffered rows to the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
