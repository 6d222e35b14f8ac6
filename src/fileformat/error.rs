use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

///////////////////////////////
/// Stream-level failures while reading, detecting or rewriting paired FASTQ.
///
/// The type is `Clone` since a batch reader hands the same deferred error out on every call
/// after the failure; I/O errors are shared through an `Arc` for that reason.
/// End of stream is not an error, readers return `Ok(None)` for it.
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("Paired FASTQ files are out of sync: the {exhausted} file ended before its mate (line {line})")]
    Desync { line: usize, exhausted: &'static str },

    #[error("Malformed FASTQ record at line {line}: {msg}")]
    MalformedLine { line: usize, msg: String },

    #[error("Could not recognize a barcode convention in the first {sampled} read pairs")]
    FormatUnknown { sampled: usize },

    #[error("Failed writing to {:?}: {source}", path)]
    SinkWrite {
        path: PathBuf,
        source: Arc<std::io::Error>,
    },

    #[error("Failed reading FASTQ at line {line}: {source}")]
    Io {
        line: usize,
        source: Arc<std::io::Error>,
    },
}

impl Error {
    #[cold]
    pub fn desync(line: usize, exhausted: &'static str) -> Self {
        Error::Desync { line, exhausted }
    }

    #[cold]
    pub fn malformed_line<M: Into<String>>(line: usize, msg: M) -> Self {
        Error::MalformedLine {
            line,
            msg: msg.into(),
        }
    }

    #[cold]
    pub fn sink_write<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Error::SinkWrite {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    #[cold]
    pub fn io(line: usize, source: std::io::Error) -> Self {
        Error::Io {
            line,
            source: Arc::new(source),
        }
    }
}
