use std::io::BufRead;

use log::warn;

use crate::barcode::{BarcodeExtractor, Convention, Validity};
use crate::fileformat::{Error, FastqCursor, ReadRecord};
use crate::runtime::ReaderConfig;

///////////////////////////////
/// A forward/reverse read pair together with what was derived from the forward header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedRecord {
    pub forward: ReadRecord,
    pub reverse: ReadRecord,
    /// Forward read name without a /1 or /2 mate suffix
    pub read_id: String,
    /// Last forward header field if there is more than one field, else empty
    pub read_group_id: String,
    /// Empty if the header carried no barcode
    pub barcode: Vec<u8>,
    pub validity: Validity,
    /// Line of the forward header, 1-based
    pub line_number: usize,
}

impl PairedRecord {
    pub fn has_barcode(&self) -> bool {
        !self.barcode.is_empty()
    }
}

fn strip_mate_suffix(name: &str) -> &str {
    name.strip_suffix("/1")
        .or_else(|| name.strip_suffix("/2"))
        .unwrap_or(name)
}

///////////////////////////////
/// Reads two FASTQ streams in lockstep.
///
/// Both sides are advanced on every call; one side running out before the other is a
/// `Desync`. The barcode is taken from the forward header using the convention the cursor was
/// locked to. A header without a barcode is not fatal: the pair is delivered with an empty
/// barcode and counted.
pub struct PairedFastqCursor<R1, R2> {
    forward: FastqCursor<R1>,
    reverse: FastqCursor<R2>,
    convention: Convention,
    num_pairs: usize,
    num_barcode_not_found: usize,
    failed: bool,
}

impl<R1: BufRead, R2: BufRead> PairedFastqCursor<R1, R2> {
    pub fn new(forward: R1, reverse: R2, convention: Convention) -> Self {
        PairedFastqCursor::with_config(forward, reverse, convention, &ReaderConfig::default())
    }

    pub fn with_config(
        forward: R1,
        reverse: R2,
        convention: Convention,
        config: &ReaderConfig,
    ) -> Self {
        PairedFastqCursor {
            forward: FastqCursor::with_config(forward, config),
            reverse: FastqCursor::with_config(reverse, config),
            convention,
            num_pairs: 0,
            num_barcode_not_found: 0,
            failed: false,
        }
    }

    pub fn convention(&self) -> Convention {
        self.convention
    }

    /// Pairs read so far
    pub fn num_pairs(&self) -> usize {
        self.num_pairs
    }

    /// Pairs whose forward header did not follow the locked convention
    pub fn num_barcode_not_found(&self) -> usize {
        self.num_barcode_not_found
    }

    /// Read the next pair. `Ok(None)` only when both files ended at the same record
    pub fn next_pair(&mut self) -> Result<Option<PairedRecord>, Error> {
        let forward = self.forward.next_record()?;
        let reverse = self.reverse.next_record()?;

        let (forward, reverse) = match (forward, reverse) {
            (Some(forward), Some(reverse)) => (forward, reverse),
            (None, None) => return Ok(None),
            (Some(_), None) => return Err(Error::desync(self.reverse.line(), "reverse")),
            (None, Some(_)) => return Err(Error::desync(self.forward.line(), "forward")),
        };
        self.num_pairs += 1;

        let fields = forward.header_fields();
        let read_id = strip_mate_suffix(forward.id()).to_string();
        let read_group_id = if fields.len() > 1 {
            fields[fields.len() - 1].clone()
        } else {
            String::new()
        };

        let (barcode, validity) = if self.convention == Convention::Unknown {
            (Vec::new(), Validity::Unknown)
        } else if let Some(found) = self.convention.extract(forward.header()) {
            (found.barcode.as_bytes().to_vec(), found.validity)
        } else {
            self.num_barcode_not_found += 1;
            warn!(
                "No {} barcode in header at line {}: {}",
                self.convention,
                forward.line_number(),
                forward.header()
            );
            (Vec::new(), Validity::Invalid)
        };

        let line_number = forward.line_number();
        Ok(Some(PairedRecord {
            forward,
            reverse,
            read_id,
            read_group_id,
            barcode,
            validity,
            line_number,
        }))
    }
}

impl<R1: BufRead, R2: BufRead> Iterator for PairedFastqCursor<R1, R2> {
    type Item = Result<PairedRecord, Error>;

    /// Ends after the first error
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.next_pair().transpose();
        self.failed = matches!(item, Some(Err(_)));
        item
    }
}
