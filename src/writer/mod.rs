use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub const WRITER_BUFFER_SIZE: usize = 256 * 1024;

/// Compression format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
}

impl Compression {
    /// Detect compression format from file extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("gz" | "gzip") => Compression::Gzip,
            _ => Compression::None,
        }
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compression::None => write!(f, "none"),
            Compression::Gzip => write!(f, "gzip"),
        }
    }
}

/// Buffered destination for a generated fixture: a file, a gzip file, or stdout
pub enum OutputWriter {
    Plain(BufWriter<Box<dyn Write>>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl OutputWriter {
    /// Open `path`, or stdout when no path is given
    pub fn create(path: Option<&Path>) -> io::Result<Self> {
        let Some(path) = path else {
            let stdout: Box<dyn Write> = Box::new(io::stdout());
            return Ok(OutputWriter::Plain(BufWriter::with_capacity(
                WRITER_BUFFER_SIZE,
                stdout,
            )));
        };

        let file = File::create(path)?;
        match Compression::from_path(path) {
            Compression::Gzip => {
                let writer = BufWriter::with_capacity(WRITER_BUFFER_SIZE, file);
                Ok(OutputWriter::Gzip(GzEncoder::new(
                    writer,
                    flate2::Compression::default(),
                )))
            }
            Compression::None => {
                let file: Box<dyn Write> = Box::new(file);
                Ok(OutputWriter::Plain(BufWriter::with_capacity(
                    WRITER_BUFFER_SIZE,
                    file,
                )))
            }
        }
    }

    /// Flush everything, writing the gzip trailer if compressed
    pub fn finish(self) -> io::Result<()> {
        match self {
            OutputWriter::Plain(mut writer) => writer.flush(),
            OutputWriter::Gzip(encoder) => encoder.finish()?.flush(),
        }
    }
}

impl Write for OutputWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputWriter::Plain(writer) => writer.write(buf),
            OutputWriter::Gzip(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputWriter::Plain(writer) => writer.flush(),
            OutputWriter::Gzip(writer) => writer.flush(),
        }
    }
}
