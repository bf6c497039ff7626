use crate::core::model::{DEFAULT_MIN_LEN, DEFAULT_READ_LEN};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "trim-eval",
    version,
    about = "Score adapter trimming against simulated paired-end reads"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Histogram of sequence line lengths, longest first.
    Seqlens(SeqLensArgs),
    /// Base-level sensitivity and specificity of one trimming run.
    Evaluate(EvaluateArgs),
    /// Collect trimmed_*.txt reports into a sorted table and a scatter chart.
    Aggregate(AggregateArgs),
}

#[derive(Args)]
pub struct SeqLensArgs {
    /// FASTQ input, plain or gzipped; `-` reads stdin.
    #[arg(default_value = "-")]
    pub input: PathBuf,

    #[arg(long)]
    pub out: Option<PathBuf>,

    #[arg(long, default_value_t = num_cpus::get())]
    pub threads: usize,
}

#[derive(Args)]
pub struct EvaluateArgs {
    /// Simulated read 1 with true insert lengths in the headers.
    pub original1: PathBuf,
    /// Simulated read 2.
    pub original2: PathBuf,
    /// Trimmer output for read 1.
    pub trimmed1: PathBuf,
    /// Trimmer output for read 2.
    pub trimmed2: PathBuf,

    /// Untrimmed read length.
    #[arg(long, default_value_t = DEFAULT_READ_LEN)]
    pub read_len: usize,

    /// Shortest insert the trimmer is expected to keep.
    #[arg(long, default_value_t = DEFAULT_MIN_LEN)]
    pub min_len: usize,

    /// Write the report here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    #[arg(long, default_value_t = num_cpus::get())]
    pub threads: usize,
}

#[derive(Args)]
pub struct AggregateArgs {
    /// Directory holding trimmed_*.txt reports.
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Sorted table; relative paths resolve inside DIR.
    #[arg(long, default_value = "spec_sorted_results.txt")]
    pub summary: PathBuf,

    /// Chart page; relative paths resolve inside DIR.
    #[arg(long, default_value = "result.html")]
    pub html: PathBuf,
}
