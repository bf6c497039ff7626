use crate::core::fastq::RecordReader;
use crate::core::io::InputSource;
use crate::core::label::{RunLabel, is_report_name};
use crate::core::metrics::{BaseCounts, LengthHist, OutcomeTally};
use crate::core::model::{LengthTable, RunResult, ScoringBounds, sort_by_specificity};
use crate::report::accuracy_txt::ReportedRates;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub struct SeqLensConfig {
    pub input: PathBuf,
    pub threads: usize,
}

pub struct EvalConfig {
    pub originals: [PathBuf; 2],
    pub trimmed: [PathBuf; 2],
    pub bounds: ScoringBounds,
    pub threads: usize,
}

pub struct AggregateConfig {
    pub dir: PathBuf,
}

pub struct EvalOutput {
    pub counts: BaseCounts,
    pub tally: OutcomeTally,
    pub truth_records: usize,
    pub trimmed_records: usize,
    /// Original headers without a parseable insert length.
    pub unlabelled: u64,
}

pub fn run_seqlens(cfg: &SeqLensConfig) -> Result<LengthHist> {
    let t = Instant::now();
    let mut input = InputSource::open(&cfg.input, cfg.threads)?;
    let mut hist = LengthHist::new();
    while let Some(line) = input
        .next_line()
        .with_context(|| format!("failed to read {}", cfg.input.display()))?
    {
        hist.update_line(line);
    }
    info!("seqlens: {} sequences tallied", hist.total());
    log_stage("seqlens.scan", t);
    Ok(hist)
}

pub fn evaluate(cfg: &EvalConfig) -> Result<EvalOutput> {
    let t_total = Instant::now();

    let t_truth = Instant::now();
    let mut truth = LengthTable::new();
    let mut unlabelled = 0u64;
    for path in &cfg.originals {
        scan_records(path, cfg.threads, |rec| {
            match rec.insert_len() {
                Some(len) => truth.insert(rec.into_id(), len),
                None => {
                    debug!("{}: no insert length in header {:?}", path.display(), rec.id());
                    unlabelled += 1;
                }
            }
        })?;
    }
    if unlabelled > 0 {
        warn!(
            "{} original records carry no insert length in their header and were skipped",
            unlabelled
        );
    }
    if truth.is_empty() {
        warn!("no ground-truth records found; every count will be zero");
    }
    log_stage("evaluate.ground_truth", t_truth);

    let t_trimmed = Instant::now();
    let mut observed = LengthTable::new();
    for path in &cfg.trimmed {
        scan_records(path, cfg.threads, |rec| {
            let len = rec.seq_len();
            observed.insert(rec.into_id(), len);
        })?;
    }
    log_stage("evaluate.trimmed", t_trimmed);

    let t_score = Instant::now();
    let mut counts = BaseCounts::default();
    let mut tally = OutcomeTally::default();
    for (id, true_len) in truth.iter() {
        // Reads dropped by the trimmer are scored as trimmed to nothing.
        let observed_len = match observed.get(id) {
            Some(len) => len,
            None => {
                tally.missing += 1;
                0
            }
        };
        if true_len < cfg.bounds.min_len {
            tally.short_inserts += 1;
        }
        tally.record(counts.score(true_len, observed_len, cfg.bounds));
    }
    log_stage("evaluate.score", t_score);

    if tally.missing > 0 {
        warn!(
            "{} reads absent from the trimmed output were scored as length 0",
            tally.missing
        );
    }
    info!(
        "evaluate: reads={} under_trimmed={} exact={} over_trimmed={} missing={} short_inserts={}",
        tally.reads(),
        tally.under_trimmed,
        tally.exact,
        tally.over_trimmed,
        tally.missing,
        tally.short_inserts
    );
    log_stage("evaluate.total", t_total);

    Ok(EvalOutput {
        counts,
        tally,
        truth_records: truth.len(),
        trimmed_records: observed.len(),
        unlabelled,
    })
}

fn scan_records<F>(path: &Path, threads: usize, mut f: F) -> Result<u64>
where
    F: FnMut(crate::core::model::SeqRecord),
{
    let mut reader = RecordReader::open(path, threads)?;
    let mut n = 0u64;
    while let Some(rec) = reader.next_record()? {
        f(rec);
        n += 1;
    }
    debug!("{}: {} records", path.display(), n);
    Ok(n)
}

/// Collects `trimmed_*.txt` reports from `dir`, sorted by descending
/// specificity. Files are visited in name order so ties are reproducible.
pub fn collect_runs(cfg: &AggregateConfig) -> Result<Vec<RunResult>> {
    let t = Instant::now();
    let mut names = Vec::new();
    for entry in fs::read_dir(&cfg.dir)
        .with_context(|| format!("failed to list {}", cfg.dir.display()))?
    {
        let entry = entry.with_context(|| format!("failed to list {}", cfg.dir.display()))?;
        // `Path::is_file` follows symlinks.
        if !entry.path().is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) if is_report_name(&name) => names.push(name),
            Ok(_) => {}
            Err(name) => debug!("skipping non UTF-8 file name {:?}", name),
        }
    }
    names.sort();

    let mut results: Vec<RunResult> = Vec::with_capacity(names.len());
    for name in &names {
        let label = RunLabel::from_file_name(name)?;
        let path = cfg.dir.join(name);
        let file =
            File::open(&path).with_context(|| format!("failed to open {}", path.display()))?;
        let rates = ReportedRates::scan(BufReader::new(file))
            .with_context(|| format!("failed to parse {}", path.display()))?;
        let (Some(specificity), Some(sensitivity)) = (rates.specificity, rates.sensitivity) else {
            warn!(
                "{} lacks a sensitivity or specificity line; skipped",
                path.display()
            );
            continue;
        };
        let run = RunResult {
            label,
            specificity,
            sensitivity,
        };
        match results.iter_mut().find(|r| r.label == run.label) {
            Some(existing) => {
                warn!("{} repeats label {}; later values kept", name, run.label);
                *existing = run;
            }
            None => results.push(run),
        }
    }
    if results.is_empty() {
        warn!("no usable trimmed_*.txt reports in {}", cfg.dir.display());
    }
    sort_by_specificity(&mut results);
    info!("aggregate: {} runs from {} reports", results.len(), names.len());
    log_stage("aggregate.collect", t);
    Ok(results)
}

fn log_stage(name: &str, t: Instant) {
    debug!("stage={} time={}", name, fmt_dur(t.elapsed()));
}

fn fmt_dur(d: Duration) -> String {
    if d.as_secs_f64() < 1.0 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.3}s", d.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fq(dir: &Path, name: &str, records: &[(&str, usize)]) -> PathBuf {
        let mut body = String::new();
        for (id, len) in records {
            body.push_str(&format!("{}\n{}\n+\n{}\n", id, "A".repeat(*len), "I".repeat(*len)));
        }
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn evaluate_scores_both_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let o1 = fq(
            dir.path(),
            "o1.fq",
            &[("@r1/80/1", 100), ("@r2/80/1", 100), ("@r3/20/1", 100)],
        );
        let o2 = fq(dir.path(), "o2.fq", &[("@r1/80/2", 100), ("@r2/80/2", 100), ("@junk", 5)]);
        let t1 = fq(
            dir.path(),
            "t1.fq",
            &[("@r1/80/1", 90), ("@r2/80/1", 80), ("@r3/20/1", 20)],
        );
        // @r2/80/2 was dropped by the trimmer.
        let t2 = fq(dir.path(), "t2.fq", &[("@r1/80/2", 60)]);

        let out = evaluate(&EvalConfig {
            originals: [o1, o2],
            trimmed: [t1, t2],
            bounds: ScoringBounds::default(),
            threads: 1,
        })
        .unwrap();

        assert_eq!(out.truth_records, 5);
        assert_eq!(out.trimmed_records, 4);
        assert_eq!(out.unlabelled, 1);
        assert_eq!(out.tally.under_trimmed, 1);
        assert_eq!(out.tally.exact, 2);
        assert_eq!(out.tally.over_trimmed, 2);
        assert_eq!(out.tally.missing, 1);
        // Only r3 has an insert below the default 30 bp floor.
        assert_eq!(out.tally.short_inserts, 1);
        assert_eq!(out.tally.reads(), 5);
        // 90/80 + 80/80 + 20/20 + 60/80 + 0/80
        assert_eq!(
            out.counts,
            BaseCounts {
                adapter_trimmed: 10 + 20 + 80 + 20 + 20,
                adapter_missed: 10,
                genomic_trimmed: 20 + 80,
                genomic_kept: 80 + 80 + 20 + 60,
            }
        );
    }

    #[test]
    fn collect_runs_sorts_and_skips_incomplete() {
        let dir = tempfile::tempdir().unwrap();
        let report = |spec: &str, sens: &str| {
            format!(
                "Adapter Trimmed:1\nAdapter Trimming Sensitivity: {}\nAdapter Trimming Specificity: {}\n",
                sens, spec
            )
        };
        fs::write(dir.path().join("trimmed_A1.txt"), report("0.900000", "0.7")).unwrap();
        fs::write(dir.path().join("trimmed_A2.txt"), report("0.990000", "0.6")).unwrap();
        fs::write(dir.path().join("trimmed_A3.txt"), report("0.900000", "0.8")).unwrap();
        fs::write(dir.path().join("trimmed_A4.txt"), "Adapter Trimmed:1\n").unwrap();
        fs::write(dir.path().join("other.txt"), report("1.0", "1.0")).unwrap();
        fs::create_dir(dir.path().join("trimmed_dir.txt")).unwrap();

        let runs = collect_runs(&AggregateConfig {
            dir: dir.path().to_path_buf(),
        })
        .unwrap();
        let labels: Vec<String> = runs.iter().map(|r| r.label.to_string()).collect();
        assert_eq!(labels, vec!["A:2", "A:1", "A:3"]);
        assert_eq!(runs[1].sensitivity, 0.7);
    }

    #[cfg(unix)]
    #[test]
    fn collect_runs_follows_symlinked_reports() {
        let dir = tempfile::tempdir().unwrap();
        let store = tempfile::tempdir().unwrap();
        let target = store.path().join("run.txt");
        fs::write(
            &target,
            "Adapter Trimming Sensitivity: 0.5\nAdapter Trimming Specificity: 0.25\n",
        )
        .unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("trimmed_A7.txt")).unwrap();
        std::os::unix::fs::symlink(store.path(), dir.path().join("trimmed_link.txt")).unwrap();

        let runs = collect_runs(&AggregateConfig {
            dir: dir.path().to_path_buf(),
        })
        .unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].label.to_string(), "A:7");
        assert_eq!(runs[0].specificity, 0.25);
        assert_eq!(runs[0].sensitivity, 0.5);
    }

    #[test]
    fn evaluate_rejects_malformed_fastq() {
        let dir = tempfile::tempdir().unwrap();
        let good = fq(dir.path(), "good.fq", &[("@r1/80/1", 100)]);
        let bad = dir.path().join("bad.fq");
        fs::write(&bad, "@r1/80/1\nACGT\n+\nII\n").unwrap();

        let err = evaluate(&EvalConfig {
            originals: [good.clone(), good.clone()],
            trimmed: [good, bad],
            bounds: ScoringBounds::default(),
            threads: 1,
        })
        .err()
        .unwrap();
        assert!(format!("{:#}", err).contains("bad.fq"));
    }

    #[test]
    fn seqlens_reads_gzip() {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reads.fq.gz");
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(b"@a\nACGT\n+\nIIII\n@b\nACGT\n+\nIIII\n").unwrap();
        fs::write(&path, enc.finish().unwrap()).unwrap();

        let hist = run_seqlens(&SeqLensConfig {
            input: path,
            threads: 1,
        })
        .unwrap();
        assert_eq!(hist.total(), 2);
        assert_eq!(hist.rows()[0].length, 5);
    }
}
