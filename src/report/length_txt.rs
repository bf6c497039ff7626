use crate::core::metrics::LengthHist;
use anyhow::Result;
use std::io::Write;

pub fn write(w: &mut dyn Write, hist: &LengthHist) -> Result<()> {
    for row in hist.rows() {
        writeln!(w, "{}\t{}", row.length, row.count)?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_separated_rows() {
        let mut hist = LengthHist::new();
        for line in ["@a\n", "ACGTACGT\n", "+\n", "IIIIIIII\n", "@b\n", "ACG\n"] {
            hist.update_line(line.as_bytes());
        }
        let mut out = Vec::new();
        write(&mut out, &hist).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "9\t1\n4\t1\n");
    }
}
