use std::fmt;

///////////////////////////////
/// Whether the barcode of a read pair could be fully resolved by the sequencing chemistry.
///
/// Some technologies do not encode this at all, hence the third state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Validity {
    Valid,
    Invalid,
    Unknown,
}

impl Validity {
    pub fn from_flag(valid: bool) -> Self {
        if valid {
            Validity::Valid
        } else {
            Validity::Invalid
        }
    }

    /// Value of the VX:i tag. Unknown is written as valid, the linked-read convention for
    /// technologies that do not flag unresolved barcodes
    pub fn as_tag_value(&self) -> u8 {
        match self {
            Validity::Valid | Validity::Unknown => b'1',
            Validity::Invalid => b'0',
        }
    }
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Validity::Valid => "valid",
            Validity::Invalid => "invalid",
            Validity::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

///////////////////////////////
/// A barcode found in a FASTQ header, borrowed from the header text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedBarcode<'h> {
    pub barcode: &'h str,
    pub validity: Validity,
}

impl<'h> ExtractedBarcode<'h> {
    pub fn new(barcode: &'h str, validity: Validity) -> Self {
        ExtractedBarcode { barcode, validity }
    }
}

///////////////////////////////
/// This trait defines how one linked-read technology encodes its barcode in the read header.
///
/// Implementations are stateless and never fail: a header that does not follow the grammar
/// gives `None`.
pub trait BarcodeExtractor {
    fn extract<'h>(&self, header: &'h str) -> Option<ExtractedBarcode<'h>>;

    fn matches(&self, header: &str) -> bool {
        self.extract(header).is_some()
    }
}
