// Clippy allows for the whole crate
#![allow(clippy::should_implement_trait)]

//! KERSCAN: k-mer enriched region scanner
//!
//! This library locates genomic regions whose k-mer repetitiveness
//! exceeds a configurable density threshold, so that downstream oligo
//! probe design can be restricted to those regions.
//!
//! The detector is a sequential batch transformation: per-position
//! k-mer counts in, a minimal set of merged enriched intervals out.
//! Counting (jellyfish) and sequence extraction (bedtools) are
//! external collaborators driven by the scan command.
//!
//! # Example
//!
//! ```rust
//! use kerscan::{CountTrack, DetectParams};
//! use kerscan::commands::DetectCommand;
//!
//! let track = CountTrack::new(vec![1, 6, 7, 2], 4);
//! let params = DetectParams::new("chr1")
//!     .with_span(2)
//!     .with_threshold(5)
//!     .with_composition(1.0);
//!
//! let regions = DetectCommand::new(params).detect(&track).unwrap();
//! assert_eq!((regions[0].start, regions[0].end), (1, 6));
//! ```

pub mod bed;
pub mod commands;
pub mod config;
pub mod counts;
pub mod error;
pub mod external;
pub mod fasta;
pub mod genome;
pub mod regions;
pub mod window;

// Re-export commonly used types
pub use config::DetectParams;
pub use counts::{read_track, CountReader, CountRecord, CountTrack};
pub use error::{Result, ScanError};
pub use genome::Genome;
pub use regions::Region;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::commands::{DetectCommand, GenerateCommand, ScanCommand};
    pub use crate::config::DetectParams;
    pub use crate::counts::{read_track, CountReader, CountRecord, CountTrack};
    pub use crate::error::{Result, ScanError};
    pub use crate::regions::Region;
}
