use crate::core::model::RunResult;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes runs, already sorted, as a tab-separated table.
pub fn write(path: &Path, results: &[RunResult]) -> Result<()> {
    let mut w = BufWriter::new(
        File::create(path).with_context(|| format!("create {} failed", path.display()))?,
    );
    write_rows(&mut w, results)?;
    w.flush()?;
    Ok(())
}

fn write_rows(w: &mut dyn Write, results: &[RunResult]) -> Result<()> {
    writeln!(w, "#Fname\tSpecificity\tSensitivity")?;
    for r in results {
        writeln!(
            w,
            "{}\t{:.6}\t{:.6}",
            r.label, r.specificity, r.sensitivity
        )?;
    }
    Ok(())
}
