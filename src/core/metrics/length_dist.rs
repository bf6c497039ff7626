use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LengthDistRow {
    pub length: usize,
    pub count: u64,
}

/// Raw-line length histogram over a FASTQ-like stream.
///
/// Any line starting with `@` arms the tally; the line right after it is
/// counted by its byte length, terminator included. Nothing else about the
/// record layout is checked, so malformed input is miscounted rather than
/// rejected.
#[derive(Clone, Debug, Default)]
pub struct LengthHist {
    counts: BTreeMap<usize, u64>,
    since_marker: u64,
    armed: bool,
}

impl LengthHist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_line(&mut self, line: &[u8]) {
        self.since_marker += 1;
        if line.first() == Some(&b'@') {
            self.since_marker = 0;
            self.armed = true;
        }
        if self.armed && self.since_marker == 1 {
            *self.counts.entry(line.len()).or_insert(0) += 1;
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Rows in descending length order.
    pub fn rows(&self) -> Vec<LengthDistRow> {
        self.counts
            .iter()
            .rev()
            .map(|(&length, &count)| LengthDistRow { length, count })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hist_of(text: &[u8]) -> LengthHist {
        let mut h = LengthHist::new();
        for line in text.split_inclusive(|&b| b == b'\n') {
            h.update_line(line);
        }
        h
    }

    #[test]
    fn counts_terminator_in_length() {
        let h = hist_of(b"@r1\nACGT\n+\nIIII\n@r2\nTTGA\n+\nIIII\n");
        assert_eq!(h.rows(), vec![LengthDistRow { length: 5, count: 2 }]);
    }

    #[test]
    fn descending_by_length() {
        let h = hist_of(b"@a\nAC\n+\nII\n@b\nACGTA\n+\nIIIII\n@c\nACG");
        assert_eq!(
            h.rows(),
            vec![
                LengthDistRow { length: 6, count: 1 },
                LengthDistRow { length: 3, count: 2 },
            ]
        );
        assert_eq!(h.total(), 3);
    }

    #[test]
    fn lines_before_first_marker_are_ignored() {
        let h = hist_of(b"ACGT\nACGT\n@a\nACG\n");
        assert_eq!(h.rows(), vec![LengthDistRow { length: 4, count: 1 }]);
    }

    #[test]
    fn marker_quality_line_does_not_double_count() {
        let h = hist_of(b"@a\nACGT\n+\n@III\n@b\nAC\n+\nII\n");
        assert_eq!(
            h.rows(),
            vec![
                LengthDistRow { length: 5, count: 1 },
                LengthDistRow { length: 3, count: 1 },
            ]
        );
    }
}
