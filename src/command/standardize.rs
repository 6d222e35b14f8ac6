use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use flate2::{write::GzEncoder, Compression};
use log::{debug, info};

use crate::barcode::{Convention, Validity};
use crate::common;
use crate::fileformat::{self, Error, PairedFastqCursor, PairedRecord};
use crate::runtime::{DetectConfig, ReaderConfig};

pub const DEFAULT_PATH_OUT: &str = ".";
pub const DEFAULT_FORMAT: &str = "auto";

/// Commandline option: Convert paired FASTQ to the canonical BX:Z/VX:i header format
#[derive(Args)]
pub struct StandardizeCMD {
    // FASTQ for r1
    #[arg(long = "r1", value_parser)]
    pub path_forward: PathBuf,

    // FASTQ for r2
    #[arg(long = "r2", value_parser)]
    pub path_reverse: PathBuf,

    // Directory for standard.R1.fq.gz and standard.R2.fq.gz
    #[arg(short = 'o', long = "out-dir", value_parser, default_value = DEFAULT_PATH_OUT)]
    pub path_out_dir: PathBuf,

    // Barcode convention of the input, or "auto" to detect it
    #[arg(long = "format", default_value = DEFAULT_FORMAT)]
    pub format: String,

    // Number of read pairs to sample for detection
    #[arg(long = "sample-size", value_parser = clap::value_parser!(usize), default_value_t = common::DEFAULT_DETECT_SAMPLE_SIZE)]
    pub sample_size: usize,
}

impl StandardizeCMD {
    /// Run the commandline option.
    /// Prints the forward and reverse files to use downstream, which are the inputs
    /// themselves if they were canonical already
    pub fn try_execute(&mut self) -> Result<()> {
        fileformat::verify_input_fq_file(&self.path_forward)?;
        fileformat::verify_input_fq_file(&self.path_reverse)?;

        let format = if self.format.eq_ignore_ascii_case(DEFAULT_FORMAT) {
            None
        } else {
            Some(self.format.parse::<Convention>()?)
        };

        let params = Standardize {
            path_forward: self.path_forward.clone(),
            path_reverse: self.path_reverse.clone(),
            path_out_dir: self.path_out_dir.clone(),
            format,
            detect: DetectConfig {
                sample_size: self.sample_size,
            },
            reader: ReaderConfig::default(),
        };

        let out = params.run()?;
        println!("{}\t{}", out.forward.display(), out.reverse.display());
        Ok(())
    }
}

///////////////////////////////
/// Counts from one rewrite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardizeSummary {
    pub pairs: usize,
    pub valid: usize,
    pub invalid: usize,
    pub unknown: usize,
    pub barcode_not_found: usize,
}

///////////////////////////////
/// Writes read pairs with canonical headers: "<read_id>/1 BX:Z:<barcode> VX:i:<0|1>" for the
/// forward read, and the same with "/2" for the reverse read.
///
/// Both sinks are written from the same loop, pair by pair, so neither side can run ahead
/// of the other.
pub struct StandardizingWriter<W1, W2> {
    forward: W1,
    reverse: W2,
    path_forward: PathBuf,
    path_reverse: PathBuf,
    header: Vec<u8>,
}

impl<W1: Write, W2: Write> StandardizingWriter<W1, W2> {
    /// `path_forward` and `path_reverse` only name the sinks in error messages
    pub fn new(
        forward: W1,
        reverse: W2,
        path_forward: impl Into<PathBuf>,
        path_reverse: impl Into<PathBuf>,
    ) -> Self {
        StandardizingWriter {
            forward,
            reverse,
            path_forward: path_forward.into(),
            path_reverse: path_reverse.into(),
            header: Vec::new(),
        }
    }

    ////// Canonical header for one mate, without the leading '@'
    fn make_header(&mut self, pair: &PairedRecord, mate: u8) {
        self.header.clear();
        self.header.extend_from_slice(pair.read_id.as_bytes());
        self.header.push(b'/');
        self.header.push(mate);
        self.header.push(b' ');
        self.header.extend_from_slice(common::TAG_BARCODE.as_bytes());
        self.header.extend_from_slice(&pair.barcode);
        self.header.push(b' ');
        self.header.extend_from_slice(common::TAG_BARCODE_VALID.as_bytes());
        self.header.push(pair.validity.as_tag_value());
    }

    pub fn write_pair(&mut self, pair: &PairedRecord) -> Result<(), Error> {
        self.make_header(pair, b'1');
        fileformat::write_fastq_record(
            &mut self.forward,
            &self.header,
            pair.forward.sequence(),
            pair.forward.quality(),
        )
        .map_err(|e| Error::sink_write(&self.path_forward, e))?;

        self.make_header(pair, b'2');
        fileformat::write_fastq_record(
            &mut self.reverse,
            &self.header,
            pair.reverse.sequence(),
            pair.reverse.quality(),
        )
        .map_err(|e| Error::sink_write(&self.path_reverse, e))?;
        Ok(())
    }

    /// Rewrite everything the cursor delivers. A read failure stops the rewrite, a header
    /// without barcode does not: such pairs get an empty BX and VX:i:0
    pub fn rewrite<R1: BufRead, R2: BufRead>(
        &mut self,
        cursor: &mut PairedFastqCursor<R1, R2>,
    ) -> Result<StandardizeSummary, Error> {
        let mut summary = StandardizeSummary::default();
        while let Some(pair) = cursor.next_pair()? {
            self.write_pair(&pair)?;
            summary.pairs += 1;
            match pair.validity {
                Validity::Valid => summary.valid += 1,
                Validity::Invalid => summary.invalid += 1,
                Validity::Unknown => summary.unknown += 1,
            }
        }
        summary.barcode_not_found = cursor.num_barcode_not_found();
        self.flush()?;
        Ok(summary)
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.forward
            .flush()
            .map_err(|e| Error::sink_write(&self.path_forward, e))?;
        self.reverse
            .flush()
            .map_err(|e| Error::sink_write(&self.path_reverse, e))?;
        Ok(())
    }

    pub fn into_inner(self) -> (W1, W2) {
        (self.forward, self.reverse)
    }
}

///////////////////////////////
/// Files to hand to the batching stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardizedPaths {
    pub forward: PathBuf,
    pub reverse: PathBuf,
    pub convention: Convention,
    /// False if the input was canonical and is used as is
    pub rewritten: bool,
}

///////////////////////////////
/// Detect the barcode convention of a pair of FASTQ files and, unless it is canonical
/// already, rewrite them as gzipped canonical FASTQ
#[derive(Debug, Clone)]
pub struct Standardize {
    pub path_forward: PathBuf,
    pub path_reverse: PathBuf,
    pub path_out_dir: PathBuf,
    /// Skip detection and assume this convention
    pub format: Option<Convention>,
    pub detect: DetectConfig,
    pub reader: ReaderConfig,
}

type GzSink = BufWriter<GzEncoder<File>>;

fn create_gz_sink(path: &Path) -> Result<GzSink, Error> {
    let file = File::create(path).map_err(|e| Error::sink_write(path, e))?;
    Ok(BufWriter::new(GzEncoder::new(file, Compression::default())))
}

fn finish_gz_sink(sink: GzSink, path: &Path) -> Result<(), Error> {
    let encoder = sink
        .into_inner()
        .map_err(|e| Error::sink_write(path, e.into_error()))?;
    encoder.finish().map_err(|e| Error::sink_write(path, e))?;
    Ok(())
}

impl Standardize {
    pub fn new(path_forward: PathBuf, path_reverse: PathBuf, path_out_dir: PathBuf) -> Self {
        Standardize {
            path_forward,
            path_reverse,
            path_out_dir,
            format: None,
            detect: DetectConfig::default(),
            reader: ReaderConfig::default(),
        }
    }

    pub fn run(&self) -> Result<StandardizedPaths> {
        let convention = match self.format {
            Some(convention) => {
                info!("Using {} barcodes as requested", convention);
                convention
            }
            None => fileformat::detect_convention_from_paths(
                &self.path_forward,
                &self.path_reverse,
                &self.detect,
                &self.reader,
            )?
            .into_convention()?,
        };
        if convention == Convention::Unknown {
            anyhow::bail!("Cannot standardize with an unknown barcode convention");
        }

        // already canonical: use the input as is
        if convention.is_canonical() {
            info!("Input is already in canonical format, no rewrite needed");
            return Ok(StandardizedPaths {
                forward: self.path_forward.clone(),
                reverse: self.path_reverse.clone(),
                convention,
                rewritten: false,
            });
        }

        std::fs::create_dir_all(&self.path_out_dir).with_context(|| {
            format!(
                "Could not create output directory {}",
                self.path_out_dir.display()
            )
        })?;
        let path_out_forward = self.path_out_dir.join(common::STANDARD_R1_FILENAME);
        let path_out_reverse = self.path_out_dir.join(common::STANDARD_R2_FILENAME);

        let mut cursor = PairedFastqCursor::with_config(
            fileformat::open_fastq(&self.path_forward)?,
            fileformat::open_fastq(&self.path_reverse)?,
            convention,
            &self.reader,
        );
        let mut writer = StandardizingWriter::new(
            create_gz_sink(&path_out_forward)?,
            create_gz_sink(&path_out_reverse)?,
            &path_out_forward,
            &path_out_reverse,
        );

        debug!(
            "Rewriting {} and {} from {} to canonical format",
            self.path_forward.display(),
            self.path_reverse.display(),
            convention
        );
        let summary = writer.rewrite(&mut cursor).with_context(|| {
            format!(
                "Failed to standardize {} and {}",
                self.path_forward.display(),
                self.path_reverse.display()
            )
        })?;

        let (sink_forward, sink_reverse) = writer.into_inner();
        finish_gz_sink(sink_forward, &path_out_forward)?;
        finish_gz_sink(sink_reverse, &path_out_reverse)?;

        info!(
            "Standardized {} read pairs ({} valid, {} invalid, {} unknown validity, {} without barcode)",
            summary.pairs, summary.valid, summary.invalid, summary.unknown, summary.barcode_not_found
        );
        Ok(StandardizedPaths {
            forward: path_out_forward,
            reverse: path_out_reverse,
            convention,
            rewritten: true,
        })
    }
}
