// byte constants are easier to read than literals
pub const U8_CHAR_NEWLINE: u8 = b'\n';
pub const U8_CHAR_CARRIAGE_RETURN: u8 = b'\r';
pub const U8_CHAR_FASTQ_RECORD: u8 = b'@';
pub const U8_CHAR_FASTQ_SEPERATOR: u8 = b'+';

// SAM-style header tags of the canonical format
pub const TAG_BARCODE: &str = "BX:Z:";
pub const TAG_BARCODE_VALID: &str = "VX:i:";

pub const DEFAULT_MAX_SKIPPED_LINES: usize = 16;
pub const DEFAULT_DETECT_SAMPLE_SIZE: usize = 200;
pub const DEFAULT_MAX_BATCH_RECORDS: usize = 30_000;
pub const DEFAULT_PATHOLOGICAL_RUN: usize = 200;

pub const STANDARD_R1_FILENAME: &str = "standard.R1.fq.gz";
pub const STANDARD_R2_FILENAME: &str = "standard.R2.fq.gz";
