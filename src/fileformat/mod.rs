pub mod barcode_batch;
pub mod detect_fileformat;
pub mod error;
pub mod fastq;
pub mod paired_fastq;

pub use error::Error;

pub use fastq::open_fastq;
pub use fastq::write_fastq_record;
pub use fastq::FastqCursor;
pub use fastq::ReadRecord;

pub use paired_fastq::PairedFastqCursor;
pub use paired_fastq::PairedRecord;

pub use detect_fileformat::detect_convention;
pub use detect_fileformat::detect_convention_from_paths;
pub use detect_fileformat::verify_input_fq_file;
pub use detect_fileformat::Detection;

pub use barcode_batch::BarcodeBatchReader;
pub use barcode_batch::Batch;
