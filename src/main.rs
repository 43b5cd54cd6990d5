// Clippy allows
#![allow(clippy::too_many_arguments)]

//! KERSCAN: k-mer enriched region scanner
//!
//! Usage: kerscan <COMMAND> [OPTIONS]

use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process;

use kerscan::commands::{
    DetectCommand, GenerateCommand, GenerateConfig, ScanCommand, SizeSpec,
};
use kerscan::config::DetectParams;
use kerscan::error::{Result, ScanError};
use kerscan::genome::Genome;

#[derive(Parser)]
#[command(name = "kerscan")]
#[command(version)]
#[command(about = "KERSCAN: locate k-mer enriched genomic regions for probe design", long_about = None)]
struct Cli {
    /// Number of threads to use (default: number of CPUs)
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect enriched regions in a k-mer count file
    Detect {
        /// Input count file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output BED file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Chromosome label for the output rows
        #[arg(long)]
        chrom: String,

        /// Sliding window width in k-mer positions
        #[arg(short = 's', long, default_value = "3000")]
        span: usize,

        /// Minimum count for a position to count as successful
        #[arg(short = 't', long, default_value = "10")]
        threshold: u32,

        /// Minimum fraction of successful positions in a window
        #[arg(short = 'c', long, default_value = "0.5")]
        composition: f64,

        /// Nucleotide offset of the first count position
        #[arg(long, default_value = "0")]
        start: u64,

        /// Add a fourth column with peak window density
        #[arg(long)]
        density: bool,

        /// Genome file (chrom\tsize) for clamping region ends
        #[arg(short = 'g', long)]
        genome: Option<PathBuf>,

        /// Print detection statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Run the full pipeline: jellyfish query, detection, bedtools getfasta
    Scan {
        /// Query FASTA (one scaffold) to scan
        #[arg(short = 'f', long)]
        fasta: PathBuf,

        /// Pre-built jellyfish index of the genome
        #[arg(short = 'j', long)]
        index: PathBuf,

        /// Chromosome label for output rows and file names
        #[arg(long)]
        chrom: String,

        /// Reference FASTA used by bedtools to extract region sequences
        #[arg(long = "scaffold-fasta")]
        scaffold_fasta: PathBuf,

        /// Output BED file (default: <chrom>_regions.bed)
        #[arg(long)]
        bed: Option<PathBuf>,

        /// Output region FASTA (default: <chrom>_regions.fa)
        #[arg(long = "fasta-out")]
        fasta_out: Option<PathBuf>,

        /// Sliding window width in k-mer positions
        #[arg(short = 's', long, default_value = "3000")]
        span: usize,

        /// Minimum count for a position to count as successful
        #[arg(short = 't', long, default_value = "10")]
        threshold: u32,

        /// Minimum fraction of successful positions in a window
        #[arg(short = 'c', long, default_value = "0.5")]
        composition: f64,

        /// Nucleotide offset of the first count position
        #[arg(long, default_value = "0")]
        start: u64,

        /// Add a fourth column with peak window density
        #[arg(long)]
        density: bool,

        /// Genome file (chrom\tsize) for clamping region ends
        #[arg(short = 'g', long)]
        genome: Option<PathBuf>,

        /// Path to the jellyfish binary
        #[arg(long, default_value = "jellyfish")]
        jellyfish: PathBuf,

        /// Path to the bedtools binary
        #[arg(long, default_value = "bedtools")]
        bedtools: PathBuf,

        /// Keep the intermediate count file
        #[arg(long)]
        keep_counts: bool,

        /// Print scan statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Generate synthetic count files for benchmarking
    #[command(alias = "create")]
    Generate {
        /// Output directory
        #[arg(short, long, default_value = "./kerscan_bench_data")]
        output: PathBuf,

        /// Sizes to generate (comma-separated, e.g., "1M,5M")
        #[arg(long, default_value = "1M")]
        sizes: String,

        /// Random seed for reproducibility
        #[arg(long, default_value = "42")]
        seed: u64,

        /// K-mer length of generated records
        #[arg(long, default_value = "18")]
        kmer_len: usize,

        /// Maximum background count
        #[arg(long, default_value = "9")]
        background_max: u32,

        /// Count planted in enriched blocks
        #[arg(long, default_value = "50")]
        enriched_count: u32,

        /// Enriched block length in positions
        #[arg(long, default_value = "5000")]
        block_len: usize,

        /// One enriched block per this many positions
        #[arg(long, default_value = "50000")]
        block_every: usize,

        /// Print generation statistics to stderr
        #[arg(long)]
        stats: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // Configure thread pool if --threads specified
    if let Some(n) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .expect("Failed to initialize thread pool");
    }

    let result = match cli.command {
        Commands::Detect {
            input,
            output,
            chrom,
            span,
            threshold,
            composition,
            start,
            density,
            genome,
            stats,
        } => run_detect(
            input,
            output,
            chrom,
            span,
            threshold,
            composition,
            start,
            density,
            genome,
            stats,
        ),

        Commands::Scan {
            fasta,
            index,
            chrom,
            scaffold_fasta,
            bed,
            fasta_out,
            span,
            threshold,
            composition,
            start,
            density,
            genome,
            jellyfish,
            bedtools,
            keep_counts,
            stats,
        } => run_scan(
            fasta,
            index,
            chrom,
            scaffold_fasta,
            bed,
            fasta_out,
            span,
            threshold,
            composition,
            start,
            density,
            genome,
            jellyfish,
            bedtools,
            keep_counts,
            stats,
        ),

        Commands::Generate {
            output,
            sizes,
            seed,
            kmer_len,
            background_max,
            enriched_count,
            block_len,
            block_every,
            stats,
        } => run_generate(
            output,
            sizes,
            seed,
            kmer_len,
            background_max,
            enriched_count,
            block_len,
            block_every,
            stats,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn build_detect(
    chrom: String,
    span: usize,
    threshold: u32,
    composition: f64,
    start: u64,
    density: bool,
    genome: Option<PathBuf>,
) -> Result<DetectCommand> {
    let params = DetectParams {
        chrom,
        span,
        threshold,
        composition,
        start,
    };
    params.validate()?;

    let mut cmd = DetectCommand::new(params).with_density(density);
    if let Some(path) = genome {
        cmd = cmd.with_genome(Genome::from_file(&path)?);
    }
    Ok(cmd)
}

fn run_detect(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    chrom: String,
    span: usize,
    threshold: u32,
    composition: f64,
    start: u64,
    density: bool,
    genome: Option<PathBuf>,
    stats: bool,
) -> Result<()> {
    let cmd = build_detect(chrom, span, threshold, composition, start, density, genome)?;

    let use_stdin = match &input {
        Some(path) => path.to_string_lossy() == "-",
        None => true,
    };

    let result = if let Some(path) = output {
        let mut file = std::fs::File::create(path)?;
        if use_stdin {
            cmd.run_stdin(&mut file)?
        } else {
            cmd.run(input.unwrap(), &mut file)?
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if use_stdin {
            cmd.run_stdin(&mut handle)?
        } else {
            cmd.run(input.unwrap(), &mut handle)?
        }
    };

    if stats {
        eprintln!("Detect stats: {}", result);
    }

    Ok(())
}

fn run_scan(
    fasta: PathBuf,
    index: PathBuf,
    chrom: String,
    scaffold_fasta: PathBuf,
    bed: Option<PathBuf>,
    fasta_out: Option<PathBuf>,
    span: usize,
    threshold: u32,
    composition: f64,
    start: u64,
    density: bool,
    genome: Option<PathBuf>,
    jellyfish: PathBuf,
    bedtools: PathBuf,
    keep_counts: bool,
    stats: bool,
) -> Result<()> {
    // Output names derive from the chromosome label unless overridden.
    let bed_out = bed.unwrap_or_else(|| PathBuf::from(format!("{}_regions.bed", chrom)));
    let fasta_out = fasta_out.unwrap_or_else(|| PathBuf::from(format!("{}_regions.fa", chrom)));

    let detect = build_detect(chrom, span, threshold, composition, start, density, genome)?;

    let mut cmd = ScanCommand::new(detect);
    cmd.jellyfish = jellyfish;
    cmd.bedtools = bedtools;
    cmd.keep_counts = keep_counts;

    let result = cmd.run(&fasta, &index, &scaffold_fasta, &bed_out, &fasta_out)?;

    if stats {
        eprintln!("Scan stats: {}", result);
    }

    Ok(())
}

fn run_generate(
    output: PathBuf,
    sizes: String,
    seed: u64,
    kmer_len: usize,
    background_max: u32,
    enriched_count: u32,
    block_len: usize,
    block_every: usize,
    stats: bool,
) -> Result<()> {
    let sizes: Vec<SizeSpec> = sizes
        .split(',')
        .map(|s| {
            SizeSpec::from_str(s)
                .ok_or_else(|| ScanError::InvalidFormat(format!("Invalid size: {}", s)))
        })
        .collect::<Result<_>>()?;

    let cmd = GenerateCommand::new(GenerateConfig {
        output,
        sizes,
        seed,
        kmer_len,
        background_max,
        enriched_count,
        block_len,
        block_every,
    });

    let result = cmd.run()?;

    if stats {
        eprintln!("Generate stats: {}", result);
    }

    Ok(())
}
