use crate::common;

///////////////////////////////
/// Settings for decoding a single FASTQ stream
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReaderConfig {
    /// How many stray lines may be skipped while looking for the next '@' header
    pub max_skipped_lines: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            max_skipped_lines: common::DEFAULT_MAX_SKIPPED_LINES,
        }
    }
}

///////////////////////////////
/// Settings for barcode convention detection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetectConfig {
    /// Number of read pairs to look at before giving up
    pub sample_size: usize,
}

impl Default for DetectConfig {
    fn default() -> Self {
        DetectConfig {
            sample_size: common::DEFAULT_DETECT_SAMPLE_SIZE,
        }
    }
}

///////////////////////////////
/// Settings for grouping read pairs into barcode batches.
///
/// `max_records` caps how many pairs a single call may collect. `pathological_run` is the
/// length at which a batch is cut short if the previous batch already had the same barcode;
/// this bounds memory when the input is not sorted or a barcode is absurdly common.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    pub max_records: usize,
    pub pathological_run: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            max_records: common::DEFAULT_MAX_BATCH_RECORDS,
            pathological_run: common::DEFAULT_PATHOLOGICAL_RUN,
        }
    }
}
