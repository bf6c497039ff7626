use crate::core::model::ScoringBounds;

/// How a trimmed read's length compares to its true insert length.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrimOutcome {
    /// Adapter left behind.
    UnderTrimmed,
    Exact,
    /// Genomic bases removed.
    OverTrimmed,
}

impl TrimOutcome {
    pub fn classify(true_len: usize, observed: usize) -> Self {
        use std::cmp::Ordering;
        match observed.cmp(&true_len) {
            Ordering::Greater => TrimOutcome::UnderTrimmed,
            Ordering::Equal => TrimOutcome::Exact,
            Ordering::Less => TrimOutcome::OverTrimmed,
        }
    }
}

/// Base-level confusion counts.
///
/// Positives are adapter bases, negatives are genomic bases.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BaseCounts {
    /// TP
    pub adapter_trimmed: u64,
    /// FN
    pub adapter_missed: u64,
    /// FP
    pub genomic_trimmed: u64,
    /// TN
    pub genomic_kept: u64,
}

impl BaseCounts {
    /// Scores one read and returns its outcome.
    ///
    /// Every read is credited with `read_len - observed` trimmed adapter
    /// bases unless it was over-trimmed, in which case only the bases past
    /// the (clamped) insert count as adapter. Differences that would go
    /// negative, i.e. reads longer than `read_len`, contribute zero.
    pub fn score(&mut self, true_len: usize, observed: usize, bounds: ScoringBounds) -> TrimOutcome {
        let max = bounds.read_len;
        let outcome = TrimOutcome::classify(true_len, observed);
        match outcome {
            TrimOutcome::UnderTrimmed => {
                self.adapter_trimmed += max.saturating_sub(observed) as u64;
                self.genomic_kept += true_len as u64;
                self.adapter_missed += (observed - true_len) as u64;
            }
            TrimOutcome::Exact => {
                self.adapter_trimmed += max.saturating_sub(observed) as u64;
                self.genomic_kept += true_len as u64;
            }
            TrimOutcome::OverTrimmed => {
                let genomic = max.min(true_len);
                self.adapter_trimmed += (max - genomic) as u64;
                self.genomic_trimmed += genomic.saturating_sub(observed) as u64;
                self.genomic_kept += observed as u64;
            }
        }
        outcome
    }

    pub fn adapter_total(&self) -> u64 {
        self.adapter_trimmed + self.adapter_missed
    }

    pub fn genomic_total(&self) -> u64 {
        self.genomic_trimmed + self.genomic_kept
    }

    /// TP / (TP + FN); `None` when no adapter bases were scored.
    pub fn sensitivity(&self) -> Option<f64> {
        ratio(self.adapter_trimmed, self.adapter_total())
    }

    /// TN / (TN + FP); `None` when no genomic bases were scored.
    pub fn specificity(&self) -> Option<f64> {
        ratio(self.genomic_kept, self.genomic_total())
    }
}

fn ratio(num: u64, denom: u64) -> Option<f64> {
    if denom == 0 {
        None
    } else {
        Some(num as f64 / denom as f64)
    }
}

/// Per-read bookkeeping kept next to the base counts.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OutcomeTally {
    pub under_trimmed: u64,
    pub exact: u64,
    pub over_trimmed: u64,
    /// Reads absent from the trimmed output, scored as length zero.
    pub missing: u64,
    /// Inserts shorter than `min_len`.
    pub short_inserts: u64,
}

impl OutcomeTally {
    pub fn record(&mut self, outcome: TrimOutcome) {
        match outcome {
            TrimOutcome::UnderTrimmed => self.under_trimmed += 1,
            TrimOutcome::Exact => self.exact += 1,
            TrimOutcome::OverTrimmed => self.over_trimmed += 1,
        }
    }

    pub fn reads(&self) -> u64 {
        self.under_trimmed + self.exact + self.over_trimmed
    }
}
