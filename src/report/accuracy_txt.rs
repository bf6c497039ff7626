use crate::core::metrics::BaseCounts;
use anyhow::{Context, Result, anyhow};
use std::io::{BufRead, Write};

pub const SENSITIVITY_LABEL: &str = "Adapter Trimming Sensitivity:";
pub const SPECIFICITY_LABEL: &str = "Adapter Trimming Specificity:";

/// Writes the evaluator report.
///
/// The integer lines are written before the ratios; an undefined ratio fails
/// the call after they are flushed.
pub fn write(w: &mut dyn Write, counts: &BaseCounts) -> Result<()> {
    writeln!(w, "Adapter Trimmed:{}", counts.adapter_trimmed)?;
    writeln!(w, "Adapter Missed:{}", counts.adapter_missed)?;
    writeln!(w, "Adapter Total:{}", counts.adapter_total())?;
    writeln!(w, "Genomic Bases Trimmed:{}", counts.genomic_trimmed)?;
    writeln!(w, "Genomic Bases Total:{}", counts.genomic_total())?;
    w.flush()?;

    let sensitivity = counts
        .sensitivity()
        .context("sensitivity is undefined: no adapter bases were scored")?;
    writeln!(w, "{} {:.6}", SENSITIVITY_LABEL, sensitivity)?;
    let specificity = counts
        .specificity()
        .context("specificity is undefined: no genomic bases were scored")?;
    writeln!(w, "{} {:.6}", SPECIFICITY_LABEL, specificity)?;
    w.flush()?;
    Ok(())
}

/// Ratios recovered from a previously written report.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ReportedRates {
    pub sensitivity: Option<f64>,
    pub specificity: Option<f64>,
}

impl ReportedRates {
    /// Scans report lines; the last occurrence of each ratio wins.
    pub fn scan<R: BufRead>(reader: R) -> Result<Self> {
        let mut rates = ReportedRates::default();
        for (i, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("failed to read line {}", i + 1))?;
            if line.starts_with(SPECIFICITY_LABEL) {
                rates.specificity = Some(last_float(&line, i + 1)?);
            } else if line.starts_with(SENSITIVITY_LABEL) {
                rates.sensitivity = Some(last_float(&line, i + 1)?);
            }
        }
        Ok(rates)
    }
}

fn last_float(line: &str, line_no: usize) -> Result<f64> {
    let token = line
        .split_whitespace()
        .next_back()
        .ok_or_else(|| anyhow!("empty report line {}", line_no))?;
    token
        .parse()
        .with_context(|| format!("invalid value {:?} on line {}", token, line_no))
}
