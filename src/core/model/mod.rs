use crate::core::label::RunLabel;
use std::collections::HashMap;

pub const DEFAULT_READ_LEN: usize = 100;
pub const DEFAULT_MIN_LEN: usize = 30;

/// Header and sequence length of one FASTQ record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SeqRecord {
    id: Box<str>,
    seq_len: usize,
}

impl SeqRecord {
    pub fn new(id: impl Into<Box<str>>, seq_len: usize) -> Self {
        Self {
            id: id.into(),
            seq_len,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    /// True insert length encoded by the simulator as the second
    /// `/`-delimited header field, e.g. `@read17/83/1`.
    pub fn insert_len(&self) -> Option<usize> {
        self.id.split('/').nth(1)?.trim().parse().ok()
    }

    pub fn into_id(self) -> Box<str> {
        self.id
    }
}

/// Record lengths keyed by full header line.
#[derive(Clone, Debug, Default)]
pub struct LengthTable {
    lengths: HashMap<Box<str>, usize>,
}

impl LengthTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later records with the same header replace earlier ones.
    pub fn insert(&mut self, id: Box<str>, len: usize) {
        self.lengths.insert(id, len);
    }

    pub fn get(&self, id: &str) -> Option<usize> {
        self.lengths.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.lengths.iter().map(|(id, &len)| (id.as_ref(), len))
    }
}

/// Length bounds of the simulated library.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScoringBounds {
    /// Untrimmed read length; every base past the insert is adapter.
    pub read_len: usize,
    /// Shortest insert the trimmer is expected to keep.
    pub min_len: usize,
}

impl Default for ScoringBounds {
    fn default() -> Self {
        Self {
            read_len: DEFAULT_READ_LEN,
            min_len: DEFAULT_MIN_LEN,
        }
    }
}

/// One evaluator run as seen by the aggregator.
#[derive(Clone, Debug, PartialEq)]
pub struct RunResult {
    pub label: RunLabel,
    pub specificity: f64,
    pub sensitivity: f64,
}

/// Stable sort, highest specificity first.
pub fn sort_by_specificity(results: &mut [RunResult]) {
    results.sort_by(|a, b| b.specificity.total_cmp(&a.specificity));
}
