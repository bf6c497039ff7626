use crate::cli::args::{AggregateArgs, Cli, Commands, EvaluateArgs, SeqLensArgs};
use crate::core::engine::{self, AggregateConfig, EvalConfig, SeqLensConfig};
use crate::core::io::is_stdin;
use crate::core::model::ScoringBounds;
use crate::report;
use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub fn entry() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Seqlens(args) => seqlens(args),
        Commands::Evaluate(args) => evaluate(args),
        Commands::Aggregate(args) => aggregate(args),
    }
}

fn seqlens(args: SeqLensArgs) -> Result<()> {
    check_threads(args.threads)?;
    if !is_stdin(&args.input) {
        check_input(&args.input)?;
    }
    let hist = engine::run_seqlens(&SeqLensConfig {
        input: args.input,
        threads: args.threads,
    })?;
    let mut w = open_output(args.out.as_deref())?;
    report::length_txt::write(&mut w, &hist)
}

fn evaluate(args: EvaluateArgs) -> Result<()> {
    check_threads(args.threads)?;
    if args.read_len == 0 {
        bail!("--read-len must be >= 1");
    }
    for path in [
        &args.original1,
        &args.original2,
        &args.trimmed1,
        &args.trimmed2,
    ] {
        check_input(path)?;
    }

    let cfg = EvalConfig {
        originals: [args.original1, args.original2],
        trimmed: [args.trimmed1, args.trimmed2],
        bounds: ScoringBounds {
            read_len: args.read_len,
            min_len: args.min_len,
        },
        threads: args.threads,
    };
    let output = engine::evaluate(&cfg)?;
    info!(
        "evaluate: {} ground-truth records ({} unlabelled), {} trimmed records, {} reads scored ({} short inserts)",
        output.truth_records,
        output.unlabelled,
        output.trimmed_records,
        output.tally.reads(),
        output.tally.short_inserts
    );

    let mut w = open_output(args.out.as_deref())?;
    report::accuracy_txt::write(&mut w, &output.counts)
}

fn aggregate(args: AggregateArgs) -> Result<()> {
    if !args.dir.is_dir() {
        bail!("report directory not found: {}", args.dir.display());
    }
    let summary_path = resolve_in(&args.dir, &args.summary);
    let html_path = resolve_in(&args.dir, &args.html);

    let results = engine::collect_runs(&AggregateConfig {
        dir: args.dir.clone(),
    })?;

    report::summary_txt::write(&summary_path, &results)
        .with_context(|| format!("failed to write {}", summary_path.display()))?;
    report::html::write(&html_path, &results)
        .with_context(|| format!("failed to write {}", html_path.display()))?;
    info!(
        "aggregate: wrote {} and {}",
        summary_path.display(),
        html_path.display()
    );
    Ok(())
}

fn check_threads(threads: usize) -> Result<()> {
    if threads == 0 {
        bail!("--threads must be >= 1");
    }
    Ok(())
}

fn check_input(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("input file not found: {}", path.display());
    }
    if path.is_dir() {
        bail!("input is a directory: {}", path.display());
    }
    Ok(())
}

fn resolve_in(dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) => {
            let file =
                File::create(p).with_context(|| format!("failed to create {}", p.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}
