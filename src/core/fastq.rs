use crate::core::io::{InputKind, detect_input_kind, is_stdin, open_gzip_reader};
use crate::core::model::SeqRecord;
use anyhow::{Context, Result};
use needletail::{FastxReader, parse_fastx_file, parse_fastx_reader};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// FASTA/FASTQ records reduced to header and sequence length.
pub struct RecordReader {
    path: PathBuf,
    // `None` for an empty regular file, which needletail refuses to open.
    inner: Option<Box<dyn FastxReader>>,
}

impl RecordReader {
    /// Opens `path` (`-` for stdin). Block-gzipped files decompress on
    /// `threads` workers; other compression is left to needletail.
    pub fn open(path: &Path, threads: usize) -> Result<Self> {
        let inner = if is_stdin(path) {
            Some(parse_fastx_reader(io::stdin()).context("failed to parse stdin")?)
        } else {
            open_path(path, threads)
                .with_context(|| format!("failed to open {}", path.display()))?
        };
        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    pub fn next_record(&mut self) -> Result<Option<SeqRecord>> {
        let Some(reader) = self.inner.as_mut() else {
            return Ok(None);
        };
        let Some(record) = reader.next() else {
            return Ok(None);
        };
        let record =
            record.with_context(|| format!("FASTQ parse error in {}", self.path.display()))?;
        let id = String::from_utf8_lossy(record.id().trim_ascii_end()).into_owned();
        Ok(Some(SeqRecord::new(id, record.seq().len())))
    }
}

fn open_path(path: &Path, threads: usize) -> Result<Option<Box<dyn FastxReader>>> {
    let meta = fs::metadata(path)?;
    if !meta.is_file() {
        // Pipes cannot be rewound, so let needletail sniff the stream.
        return Ok(Some(parse_fastx_reader(File::open(path)?)?));
    }
    if meta.len() == 0 {
        return Ok(None);
    }
    let reader = match detect_input_kind(path)? {
        InputKind::Gzip if threads > 1 => parse_fastx_reader(open_gzip_reader(path, threads)?)?,
        _ => parse_fastx_file(path)?,
    };
    Ok(Some(reader))
}
