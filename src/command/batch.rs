use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use itertools::Itertools;
use log::{debug, info};
use rayon::prelude::*;

use crate::command::determine_thread_count;
use crate::common;
use crate::fileformat::{self, BarcodeBatchReader, Error};
use crate::runtime::{BatchConfig, ReaderConfig};

/// Commandline option: Group barcode-sorted canonical FASTQ into per-barcode batches
#[derive(Args)]
pub struct BatchCMD {
    // Forward FASTQ, one per shard
    #[arg(long = "r1", value_parser = clap::value_parser!(PathBuf), num_args = 1.., value_delimiter = ',')]
    pub path_forward: Vec<PathBuf>,

    // Reverse FASTQ, one per shard, same order as --r1
    #[arg(long = "r2", value_parser = clap::value_parser!(PathBuf), num_args = 1.., value_delimiter = ',')]
    pub path_reverse: Vec<PathBuf>,

    // Batch summary TSV; stdout if not given
    #[arg(short = 'o', value_parser = clap::value_parser!(PathBuf))]
    pub path_out: Option<PathBuf>,

    //Thread settings
    #[arg(short = '@', value_parser = clap::value_parser!(usize), default_value = None)]
    threads_total: Option<usize>,

    // Most read pairs in one batch
    #[arg(long = "max-batch", value_parser = clap::value_parser!(usize), default_value_t = common::DEFAULT_MAX_BATCH_RECORDS)]
    pub max_records: usize,

    // Batch length at which a barcode continuing from the previous batch is cut
    #[arg(long = "pathological-run", value_parser = clap::value_parser!(usize), default_value_t = common::DEFAULT_PATHOLOGICAL_RUN)]
    pub pathological_run: usize,
}

impl BatchCMD {
    /// Run the commandline option
    pub fn try_execute(&mut self) -> Result<()> {
        if self.path_forward.len() != self.path_reverse.len() {
            anyhow::bail!(
                "Got {} forward and {} reverse files; they must come in pairs",
                self.path_forward.len(),
                self.path_reverse.len()
            );
        }
        for path in self.path_forward.iter().chain(self.path_reverse.iter()) {
            fileformat::verify_input_fq_file(path)?;
        }

        let num_threads = determine_thread_count(self.threads_total, self.path_forward.len())?;
        info!("Using threads {}", num_threads);

        let params = BatchShards {
            shards: self
                .path_forward
                .iter()
                .cloned()
                .zip(self.path_reverse.iter().cloned())
                .collect(),
            config: BatchConfig {
                max_records: self.max_records,
                pathological_run: self.pathological_run,
            },
            reader: ReaderConfig::default(),
            num_threads,
        };
        let summary = params.run()?;

        match &self.path_out {
            Some(path_out) => {
                let file = File::create(path_out).with_context(|| {
                    format!("Could not create batch summary {}", path_out.display())
                })?;
                let mut writer = BufWriter::new(file);
                write_batch_summary(&mut writer, &summary)
                    .map_err(|e| Error::sink_write(path_out, e))?;
                writer
                    .flush()
                    .map_err(|e| Error::sink_write(path_out, e))?;
            }
            None => {
                let stdout = std::io::stdout();
                let mut writer = BufWriter::new(stdout.lock());
                write_batch_summary(&mut writer, &summary)?;
                writer.flush()?;
            }
        }
        Ok(())
    }
}

///////////////////////////////
/// One delivered batch, as seen by whoever consumes batches downstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub shard: usize,
    pub index: usize,
    pub barcode: String,
    pub records: usize,
    pub complete: bool,
}

pub fn write_batch_summary<W: Write>(writer: &mut W, summary: &[BatchSummary]) -> std::io::Result<()> {
    writeln!(writer, "{}", ["shard", "batch", "barcode", "records", "complete"].iter().join("\t"))?;
    for row in summary {
        writer.write_all(
            [
                row.shard.to_string(),
                row.index.to_string(),
                row.barcode.clone(),
                row.records.to_string(),
                (row.complete as u8).to_string(),
            ]
            .iter()
            .join("\t")
            .as_bytes(),
        )?;
        writer.write_all(&[common::U8_CHAR_NEWLINE])?;
    }
    Ok(())
}

///////////////////////////////
/// Run one batch reader per shard pair. Shards share nothing, so they are spread over a thread
/// pool; the summary comes back ordered by shard, then by batch
#[derive(Debug, Clone)]
pub struct BatchShards {
    pub shards: Vec<(PathBuf, PathBuf)>,
    pub config: BatchConfig,
    pub reader: ReaderConfig,
    pub num_threads: usize,
}

impl BatchShards {
    pub fn run(&self) -> Result<Vec<BatchSummary>> {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_threads)
            .build()
            .context("Could not start thread pool")?;

        let per_shard: Vec<Result<Vec<BatchSummary>>> = thread_pool.install(|| {
            self.shards
                .par_iter()
                .enumerate()
                .map(|(shard, (path_forward, path_reverse))| {
                    let reader = BarcodeBatchReader::from_readers(
                        fileformat::open_fastq(path_forward)?,
                        fileformat::open_fastq(path_reverse)?,
                        self.config,
                        &self.reader,
                    );
                    summarize_batches(shard, reader).with_context(|| {
                        format!(
                            "Failed batching {} and {}",
                            path_forward.display(),
                            path_reverse.display()
                        )
                    })
                })
                .collect()
        });

        let mut summary = Vec::new();
        for shard in per_shard {
            summary.extend(shard?);
        }

        let total_records: usize = summary.iter().map(|row| row.records).sum();
        let distinct_barcodes = summary.iter().map(|row| &row.barcode).unique().count();
        info!(
            "Delivered {} batches with {} read pairs and {} distinct barcodes",
            summary.len(),
            total_records,
            distinct_barcodes
        );
        Ok(summary)
    }
}

/// Drain one batch reader, handing the storage of each batch back to it
pub fn summarize_batches<R1: BufRead, R2: BufRead>(
    shard: usize,
    mut reader: BarcodeBatchReader<R1, R2>,
) -> Result<Vec<BatchSummary>, Error> {
    let mut summary = Vec::new();
    let mut storage = None;
    while let Some(batch) = reader.next_batch(storage.take())? {
        summary.push(BatchSummary {
            shard,
            index: reader.num_batches() - 1,
            barcode: String::from_utf8_lossy(batch.barcode()).into_owned(),
            records: batch.len(),
            complete: batch.is_barcode_complete(),
        });
        storage = Some(batch.into_storage());
    }
    debug!(
        "Shard {}: {} batches from {} read pairs, {} without barcode",
        shard,
        reader.num_batches(),
        reader.num_pairs(),
        reader.num_barcode_not_found()
    );
    Ok(summary)
}
