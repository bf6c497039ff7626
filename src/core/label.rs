//! Run labels derived from evaluator report file names.
//!
//! A report named `trimmed_A10_q13_L5.txt` describes the trimmer settings it
//! was produced with. The first `_` token is a fixed prefix and is dropped;
//! every remaining token is a one-character tag followed by its value, so the
//! label reads `A:10_q:13_L:5`.

use std::fmt;
use thiserror::Error;

pub const REPORT_PREFIX: &str = "trimmed_";
pub const REPORT_SUFFIX: &str = ".txt";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LabelParam {
    pub tag: char,
    pub value: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunLabel {
    params: Vec<LabelParam>,
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LabelError {
    #[error("{} does not match {}*{}", .0, REPORT_PREFIX, REPORT_SUFFIX)]
    NotAReport(String),
    #[error("empty label token #{} in {}", .index + 1, .file_name)]
    EmptyToken { file_name: String, index: usize },
}

pub fn is_report_name(file_name: &str) -> bool {
    file_name.len() >= REPORT_PREFIX.len() + REPORT_SUFFIX.len()
        && file_name.starts_with(REPORT_PREFIX)
        && file_name.ends_with(REPORT_SUFFIX)
}

impl RunLabel {
    pub fn from_file_name(file_name: &str) -> Result<Self, LabelError> {
        if !is_report_name(file_name) {
            return Err(LabelError::NotAReport(file_name.to_string()));
        }
        let stem = &file_name[..file_name.len() - REPORT_SUFFIX.len()];
        let params = stem
            .split('_')
            .skip(1)
            .enumerate()
            .map(|(index, token)| {
                let mut chars = token.chars();
                let tag = chars.next().ok_or_else(|| LabelError::EmptyToken {
                    file_name: file_name.to_string(),
                    index,
                })?;
                Ok(LabelParam {
                    tag,
                    value: chars.as_str().to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &[LabelParam] {
        &self.params
    }
}

impl fmt::Display for RunLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.params().iter().enumerate() {
            if i > 0 {
                f.write_str("_")?;
            }
            write!(f, "{}:{}", p.tag, p.value)?;
        }
        Ok(())
    }
}
