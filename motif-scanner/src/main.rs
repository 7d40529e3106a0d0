use clap::{Parser, ValueEnum};
use log::{error, info, warn, Level};
use motif_features::fasta::read_sequences;
use motif_features::library::read_meme;
use motif_features::{analyze, AnalysisConfig, MotifError};
use polars::prelude::*;
use simple_logger::init_with_level;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ScannerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("{0}")]
    Motif(#[from] MotifError),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Parquet,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

#[derive(Parser)]
#[command(
    name = "motif-scanner",
    about = "Extracts motif, k-mer and TF-IDF features from DNA sequences",
    long_about = "Scores every sequence of a FASTA file against the Position Weight Matrices \
                  of a MEME file, keeps the best scoring motifs per sequence, and computes GC \
                  content, k-mer distributions and corpus-wide TF-IDF k-mer weights. \
                  Writes features, kmers and motifs tables to the output directory.",
    version,
    after_help = "Example usage:\n    \
                  motif-scanner sequences.fa motifs.meme results/ --top-k 10\n    \
                  motif-scanner sequences.fa motifs.meme results/ --format parquet --kmer-size 4",
    color = clap::ColorChoice::Always
)]
#[derive(Debug)]
struct Args {
    /// Path to input FASTA file with DNA sequences (A, C, G, T)
    #[arg(value_name = "FASTA_FILE")]
    fasta_file: String,

    /// Path to .meme format file containing Position Weight Matrices (PWMs)
    /// for the motifs to be scanned
    #[arg(value_name = "PWM_FILE")]
    pwm_file: String,

    /// Directory for the output tables
    /// Will be created if it doesn't exist
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Length of the k-mers counted per sequence
    #[arg(long, default_value = "3")]
    kmer_size: usize,

    /// Number of best scoring motifs kept per sequence
    #[arg(long, default_value = "5")]
    top_k: usize,

    /// Output table format
    #[arg(long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Log debug messages
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn write_table(
    df: &mut DataFrame,
    dir: &Path,
    name: &str,
    format: OutputFormat,
) -> Result<(), ScannerError> {
    let path = dir.join(format!("{}.{}", name, format.extension()));
    let file = File::create(&path)?;

    match format {
        OutputFormat::Csv => {
            CsvWriter::new(file).include_header(true).finish(df)?;
        }
        OutputFormat::Parquet => {
            ParquetWriter::new(file).finish(df)?;
        }
    }

    info!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

fn run(args: &Args) -> Result<(), ScannerError> {
    let config = AnalysisConfig {
        kmer_size: args.kmer_size,
        top_k: args.top_k,
    };
    config.validate()?;

    fs::create_dir_all(&args.output_dir)?;

    let sequences = read_sequences(&args.fasta_file)?;
    info!("{} sequences to scan", sequences.len());

    let library = read_meme(&args.pwm_file)?;
    info!("{} motifs loaded", library.len());

    let analysis = analyze(&sequences, &library, &config)?;

    for diagnostic in &analysis.diagnostics {
        match (&diagnostic.sequence_id, &diagnostic.motif_id) {
            (Some(seq_id), Some(motif_id)) => {
                warn!("{} / {}: {}", seq_id, motif_id, diagnostic.error)
            }
            (Some(id), None) | (None, Some(id)) => warn!("{}: {}", id, diagnostic.error),
            (None, None) => warn!("{}", diagnostic.error),
        }
    }
    if !analysis.skipped_motifs.is_empty() {
        warn!("{} motifs skipped", analysis.skipped_motifs.len());
    }

    write_table(
        &mut analysis.summary_frame()?,
        &args.output_dir,
        "features",
        args.format,
    )?;
    write_table(
        &mut analysis.kmer_frame()?,
        &args.output_dir,
        "kmers",
        args.format,
    )?;
    write_table(
        &mut analysis.motif_frame()?,
        &args.output_dir,
        "motifs",
        args.format,
    )?;

    Ok(())
}

fn main() {
    let start_time = std::time::Instant::now();

    let args = Args::parse();

    let level = if args.verbose {
        Level::Debug
    } else if args.quiet {
        Level::Warn
    } else {
        Level::Info
    };
    init_with_level(level).unwrap();

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }

    let elapsed = start_time.elapsed();
    info!(
        "Total execution time: {:.4} minutes",
        elapsed.as_secs_f64() / 60.0
    );
}
