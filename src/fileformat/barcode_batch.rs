use std::io::BufRead;

use log::{debug, trace, warn};

use crate::barcode::Convention;
use crate::fileformat::{Error, PairedFastqCursor, PairedRecord};
use crate::runtime::{BatchConfig, ReaderConfig};

///////////////////////////////
/// Read pairs that share one barcode, in input order.
///
/// A batch is never empty and never holds two different barcodes. It is not necessarily all
/// reads of that barcode: the per-call cap and the pathological-run cut can split a barcode over
/// consecutive batches, in which case `is_barcode_complete` is false.
#[derive(Debug)]
pub struct Batch {
    records: Vec<PairedRecord>,
    barcode_complete: bool,
}

impl Batch {
    pub fn barcode(&self) -> &[u8] {
        &self.records[0].barcode
    }

    pub fn records(&self) -> &[PairedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True if the batch ended because the next pair had another barcode, or the input ended
    pub fn is_barcode_complete(&self) -> bool {
        self.barcode_complete
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PairedRecord> {
        self.records.iter()
    }

    /// Give the allocation back, to be passed into the next `next_batch` call
    pub fn into_storage(self) -> Vec<PairedRecord> {
        self.records
    }
}

impl IntoIterator for Batch {
    type Item = PairedRecord;
    type IntoIter = std::vec::IntoIter<PairedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

////// Why the reader stopped reading, kept until the caller has seen it
#[derive(Debug, Clone)]
enum Deferred {
    Exhausted,
    Failed(Error),
}

///////////////////////////////
/// Groups a barcode-sorted, canonical paired FASTQ into per-barcode batches.
///
/// A pair read past the end of a batch is kept as pending and opens the next batch. A failure
/// hit while a batch already holds pairs is deferred: the pairs are delivered first and the
/// failure is returned on the next call, and on every call after that, without reading again.
///
/// One reader per pair of files; it holds all its state itself, so readers over different shards
/// can run on different threads.
pub struct BarcodeBatchReader<R1, R2> {
    cursor: PairedFastqCursor<R1, R2>,
    config: BatchConfig,
    pending: Option<PairedRecord>,
    deferred: Option<Deferred>,
    last_barcode: Option<Vec<u8>>,
    num_batches: usize,
    error_yielded: bool,
}

impl<R1: BufRead, R2: BufRead> BarcodeBatchReader<R1, R2> {
    pub fn new(cursor: PairedFastqCursor<R1, R2>, config: BatchConfig) -> Self {
        if !cursor.convention().is_canonical() {
            warn!(
                "Batching a stream with {} barcodes; input is expected in canonical format",
                cursor.convention()
            );
        }
        BarcodeBatchReader {
            cursor,
            config,
            pending: None,
            deferred: None,
            last_barcode: None,
            num_batches: 0,
            error_yielded: false,
        }
    }

    /// Batch reader over canonical (BX/VX tagged) forward and reverse streams
    pub fn from_readers(
        forward: R1,
        reverse: R2,
        config: BatchConfig,
        reader_config: &ReaderConfig,
    ) -> Self {
        let cursor =
            PairedFastqCursor::with_config(forward, reverse, Convention::Canonical, reader_config);
        BarcodeBatchReader::new(cursor, config)
    }

    pub fn num_batches(&self) -> usize {
        self.num_batches
    }

    pub fn num_pairs(&self) -> usize {
        self.cursor.num_pairs()
    }

    pub fn num_barcode_not_found(&self) -> usize {
        self.cursor.num_barcode_not_found()
    }

    fn take_deferred(&self) -> Result<Option<Batch>, Error> {
        match &self.deferred {
            Some(Deferred::Failed(e)) => Err(e.clone()),
            Some(Deferred::Exhausted) | None => Ok(None),
        }
    }

    /// Next batch of pairs with one barcode. `Ok(None)` once the input is exhausted.
    ///
    /// `storage` may be the vector of an earlier batch (see `Batch::into_storage`); it is
    /// cleared and refilled.
    pub fn next_batch(
        &mut self,
        storage: Option<Vec<PairedRecord>>,
    ) -> Result<Option<Batch>, Error> {
        if self.deferred.is_some() {
            return self.take_deferred();
        }

        let mut records = storage.unwrap_or_default();
        records.clear();
        if let Some(pending) = self.pending.take() {
            records.push(pending);
        }

        let max_records = self.config.max_records.max(1);
        let mut barcode_complete = false;
        while records.len() < max_records {
            let pair = match self.cursor.next_pair() {
                Ok(Some(pair)) => pair,
                Ok(None) => {
                    self.deferred = Some(Deferred::Exhausted);
                    barcode_complete = true;
                    break;
                }
                Err(e) => {
                    warn!("Error: {}", e);
                    self.deferred = Some(Deferred::Failed(e));
                    break;
                }
            };

            let Some(first) = records.first() else {
                records.push(pair);
                continue;
            };

            if first.barcode != pair.barcode {
                // Belongs to the next barcode
                self.pending = Some(pair);
                barcode_complete = true;
                break;
            }
            records.push(pair);

            if records.len() >= self.config.pathological_run
                && self.last_barcode.as_deref() == Some(records[0].barcode.as_slice())
            {
                debug!(
                    "abnormal break: barcode {} continues after {} pairs",
                    String::from_utf8_lossy(&records[0].barcode),
                    records.len()
                );
                break;
            }
        }

        if records.is_empty() {
            return self.take_deferred();
        }

        match &mut self.last_barcode {
            Some(last) => {
                last.clear();
                last.extend_from_slice(&records[0].barcode);
            }
            None => self.last_barcode = Some(records[0].barcode.clone()),
        }
        self.num_batches += 1;

        trace!(
            "Batch {}: barcode {}, {} pairs",
            self.num_batches,
            String::from_utf8_lossy(&records[0].barcode),
            records.len()
        );
        Ok(Some(Batch {
            records,
            barcode_complete,
        }))
    }
}

impl<R1: BufRead, R2: BufRead> Iterator for BarcodeBatchReader<R1, R2> {
    type Item = Result<Batch, Error>;

    /// Unlike `next_batch`, the iterator yields a failure once and then ends
    fn next(&mut self) -> Option<Self::Item> {
        if self.error_yielded {
            return None;
        }
        let item = self.next_batch(None).transpose();
        self.error_yielded = matches!(item, Some(Err(_)));
        item
    }
}
