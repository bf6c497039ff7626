use anyhow::{Context, Result, anyhow};
use flate2::read::MultiGzDecoder;
use gzp::deflate::{Bgzf, Mgzip};
use gzp::par::decompress::ParDecompressBuilder;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const STREAM_BUF: usize = 1024 * 1024;

pub struct MmapSource {
    mmap: Mmap,
}

impl MmapSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        // SAFETY: read-only file mapping.
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("mmap failed for {}", path.display()))?;
        Ok(Self { mmap })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.mmap
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputKind {
    Plain,
    Gzip,
}

/// Line-oriented view over a plain, gzipped or piped input.
///
/// Lines are yielded with their terminator attached; callers decide whether
/// the terminator counts.
pub enum InputSource {
    Mmap { source: MmapSource, pos: usize },
    Stream { reader: Box<dyn BufRead>, buf: Vec<u8> },
}

impl InputSource {
    /// Opens `path`, or standard input when `path` is `-`.
    pub fn open(path: &Path, threads: usize) -> Result<Self> {
        if is_stdin(path) {
            return Self::stdin();
        }
        let meta = std::fs::metadata(path)
            .with_context(|| format!("failed to stat {}", path.display()))?;
        if !meta.is_file() {
            // Pipes can only be read once, so sniff instead of reopening.
            let file =
                File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            return Self::sniffed(BufReader::with_capacity(STREAM_BUF, file))
                .with_context(|| format!("failed to read {}", path.display()));
        }
        match detect_input_kind(path)? {
            InputKind::Plain => {
                if meta.len() == 0 {
                    let file = File::open(path)
                        .with_context(|| format!("failed to open {}", path.display()))?;
                    return Ok(Self::stream(Box::new(BufReader::new(file))));
                }
                Ok(InputSource::Mmap {
                    source: MmapSource::open(path)?,
                    pos: 0,
                })
            }
            InputKind::Gzip => {
                let reader = open_gzip_reader(path, threads)?;
                Ok(Self::stream(Box::new(BufReader::with_capacity(
                    STREAM_BUF, reader,
                ))))
            }
        }
    }

    pub fn stdin() -> Result<Self> {
        let reader = BufReader::with_capacity(STREAM_BUF, io::stdin().lock());
        Self::sniffed(reader).context("failed to read stdin")
    }

    fn sniffed<R: BufRead + 'static>(mut reader: R) -> Result<Self> {
        let head = reader.fill_buf()?;
        if head.starts_with(&GZIP_MAGIC) {
            let decoder = MultiGzDecoder::new(reader);
            return Ok(Self::stream(Box::new(BufReader::with_capacity(
                STREAM_BUF, decoder,
            ))));
        }
        Ok(Self::stream(Box::new(reader)))
    }

    fn stream(reader: Box<dyn BufRead>) -> Self {
        InputSource::Stream {
            reader,
            buf: Vec::with_capacity(256),
        }
    }

    /// Next raw line including its `\n` (absent only on an unterminated last line).
    pub fn next_line(&mut self) -> Result<Option<&[u8]>> {
        match self {
            InputSource::Mmap { source, pos } => {
                let bytes = source.bytes();
                let start = *pos;
                if start >= bytes.len() {
                    return Ok(None);
                }
                let end = match memchr::memchr(b'\n', &bytes[start..]) {
                    Some(i) => start + i + 1,
                    None => bytes.len(),
                };
                *pos = end;
                Ok(Some(&bytes[start..end]))
            }
            InputSource::Stream { reader, buf } => {
                buf.clear();
                let n = reader
                    .read_until(b'\n', buf)
                    .context("failed to read input line")?;
                if n == 0 {
                    Ok(None)
                } else {
                    Ok(Some(buf.as_slice()))
                }
            }
        }
    }
}

pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

pub fn detect_input_kind(path: &Path) -> Result<InputKind> {
    if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
        let ext = ext.to_ascii_lowercase();
        if ext == "gz" {
            return Ok(InputKind::Gzip);
        }
    }
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut magic = [0u8; 2];
    let n = file
        .read(&mut magic)
        .with_context(|| format!("failed to read magic bytes of {}", path.display()))?;
    if n == 2 && magic == GZIP_MAGIC {
        Ok(InputKind::Gzip)
    } else {
        Ok(InputKind::Plain)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum GzipVariant {
    Standard,
    Mgzip,
    Bgzf,
}

fn detect_gzip_variant(path: &Path) -> Result<GzipVariant> {
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut header = [0u8; 20];
    let n = file
        .read(&mut header)
        .with_context(|| "failed to read gzip header")?;
    Ok(gzip_variant_from_header(&header[..n]))
}

fn gzip_variant_from_header(header: &[u8]) -> GzipVariant {
    if header.len() < 14 || header[..2] != GZIP_MAGIC {
        return GzipVariant::Standard;
    }
    // FEXTRA flag; the subfield id tells block-gzip flavours apart.
    if header[3] & 4 == 0 {
        return GzipVariant::Standard;
    }
    match (header[12], header[13]) {
        (b'B', b'C') => GzipVariant::Bgzf,
        (b'I', b'G') => GzipVariant::Mgzip,
        _ => GzipVariant::Standard,
    }
}

pub fn open_gzip_reader(path: &Path, threads: usize) -> Result<Box<dyn Read + Send>> {
    let variant = detect_gzip_variant(path)?;
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let reader: Box<dyn Read + Send> = match variant {
        GzipVariant::Bgzf if threads > 1 => Box::new(
            ParDecompressBuilder::<Bgzf>::new()
                .num_threads(threads)
                .map_err(|e| anyhow!("invalid decompression thread count {}: {}", threads, e))?
                .from_reader(reader),
        ),
        GzipVariant::Mgzip if threads > 1 => Box::new(
            ParDecompressBuilder::<Mgzip>::new()
                .num_threads(threads)
                .map_err(|e| anyhow!("invalid decompression thread count {}: {}", threads, e))?
                .from_reader(reader),
        ),
        _ => Box::new(MultiGzDecoder::new(reader)),
    };
    Ok(reader)
}
