mod length_dist;
mod trim_accuracy;

pub use length_dist::LengthHist;
pub use trim_accuracy::{BaseCounts, OutcomeTally};
