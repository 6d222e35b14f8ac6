use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::Context;
use log::{debug, warn};

use crate::common;
use crate::fileformat::Error;
use crate::runtime::ReaderConfig;

///////////////////////////////
/// One FASTQ read: header (without '@'), sequence and quality
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRecord {
    header: String,
    header_fields: Vec<String>,
    sequence: Vec<u8>,
    quality: Vec<u8>,
    line_number: usize,
}

impl ReadRecord {
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Whitespace-separated header tokens; the first one is the read name
    pub fn header_fields(&self) -> &[String] {
        &self.header_fields
    }

    pub fn id(&self) -> &str {
        self.header_fields
            .first()
            .map(|s| s.as_str())
            .unwrap_or_default()
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn quality(&self) -> &[u8] {
        &self.quality
    }

    /// Line of the header in the input, 1-based
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

///////////////////////////////
/// Decodes 4-line FASTQ units from a byte stream.
///
/// Blank lines between records are ignored. Other stray lines before a header are skipped with
/// a warning, but only up to `ReaderConfig::max_skipped_lines` in a row; a corrupt stream ends in `MalformedLine`
/// rather than being scanned forever. A record cut off by the end of input is also
/// `MalformedLine`, never silently dropped.
pub struct FastqCursor<R> {
    reader: R,
    line: usize,
    max_skipped_lines: usize,
    failed: bool,
}

impl<R: BufRead> FastqCursor<R> {
    pub fn new(reader: R) -> Self {
        FastqCursor::with_config(reader, &ReaderConfig::default())
    }

    pub fn with_config(reader: R, config: &ReaderConfig) -> Self {
        FastqCursor {
            reader,
            line: 0,
            max_skipped_lines: config.max_skipped_lines,
            failed: false,
        }
    }

    /// Number of lines consumed so far
    pub fn line(&self) -> usize {
        self.line
    }

    ////// Read one line without its terminator; None at end of input
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, Error> {
        let mut buf = Vec::new();
        let n = self
            .reader
            .read_until(common::U8_CHAR_NEWLINE, &mut buf)
            .map_err(|e| Error::io(self.line + 1, e))?;
        if n == 0 {
            return Ok(None);
        }
        self.line += 1;

        if buf.last() == Some(&common::U8_CHAR_NEWLINE) {
            buf.pop();
            if buf.last() == Some(&common::U8_CHAR_CARRIAGE_RETURN) {
                buf.pop();
            }
        }
        Ok(Some(buf))
    }

    ////// A line that must be there because a record has been started
    fn read_record_line(&mut self, what: &str) -> Result<Vec<u8>, Error> {
        match self.read_line()? {
            Some(line) => Ok(line),
            None => Err(Error::malformed_line(
                self.line,
                format!("file ended before the {} line of the record", what),
            )),
        }
    }

    /// Read the next record. `Ok(None)` means the input ended cleanly between records
    pub fn next_record(&mut self) -> Result<Option<ReadRecord>, Error> {
        let mut skipped = 0;
        let header = loop {
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            if line.first() == Some(&common::U8_CHAR_FASTQ_RECORD) {
                break line;
            }
            if line.is_empty() {
                continue;
            }

            skipped += 1;
            if skipped > self.max_skipped_lines {
                return Err(Error::malformed_line(
                    self.line,
                    format!("no record start found after skipping {} lines", skipped - 1),
                ));
            }
            warn!(
                "Bad line: {:?} at {}",
                String::from_utf8_lossy(&line),
                self.line
            );
        };
        let line_number = self.line;

        let header = String::from_utf8(header[1..].to_vec())
            .map_err(|_| Error::malformed_line(line_number, "header is not valid UTF-8"))?;
        let header_fields: Vec<String> = header
            .split_ascii_whitespace()
            .map(|s| s.to_string())
            .collect();
        if header_fields.is_empty() {
            return Err(Error::malformed_line(line_number, "empty header"));
        }

        let sequence = self.read_record_line("sequence")?;
        let separator = self.read_record_line("separator")?;
        if separator.first() != Some(&common::U8_CHAR_FASTQ_SEPERATOR) {
            warn!(
                "Separator line of record at {} does not start with '+': {:?}",
                line_number,
                String::from_utf8_lossy(&separator)
            );
        }
        let quality = self.read_record_line("quality")?;

        if sequence.len() != quality.len() {
            return Err(Error::malformed_line(
                self.line,
                format!(
                    "quality has length {} but sequence has length {}",
                    quality.len(),
                    sequence.len()
                ),
            ));
        }

        Ok(Some(ReadRecord {
            header,
            header_fields,
            sequence,
            quality,
            line_number,
        }))
    }
}

impl<R: BufRead> Iterator for FastqCursor<R> {
    type Item = Result<ReadRecord, Error>;

    /// Ends after the first error; the stream position is undefined past a broken record
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.next_record().transpose();
        self.failed = matches!(item, Some(Err(_)));
        item
    }
}

/// Open a FASTQ file, plain or compressed. The compression is sniffed from the first bytes
pub fn open_fastq(path: &Path) -> anyhow::Result<BufReader<Box<dyn std::io::Read>>> {
    let file = File::open(path)
        .with_context(|| format!("Could not open fastq file {}", path.display()))?;
    let len = file
        .metadata()
        .with_context(|| format!("Could not read metadata of fastq file {}", path.display()))?
        .len();
    if len == 0 {
        // too short for compression sniffing, nothing to read anyway
        warn!("Input file {} is empty", path.display());
        return Ok(BufReader::new(Box::new(std::io::empty())));
    }
    let (reader, compression) = niffler::get_reader(Box::new(file))
        .with_context(|| format!("Could not open fastq file {}", path.display()))?;

    debug!(
        "Opened file {} with compression {:?}",
        path.display(),
        compression
    );
    Ok(BufReader::new(reader))
}

////////// Write one FASTQ read
pub fn write_fastq_record<W: Write>(
    writer: &mut W,
    head: &[u8],
    seq: &[u8],
    qual: &[u8],
) -> std::io::Result<()> {
    writer.write_all(b"@")?;
    writer.write_all(head)?;
    writer.write_all(b"\n")?;
    writer.write_all(seq)?;
    writer.write_all(b"\n+\n")?;
    writer.write_all(qual)?;
    writer.write_all(b"\n")?;
    Ok(())
}
