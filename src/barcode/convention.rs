use std::fmt;

use crate::barcode::{
    BarcodeExtractor, ExtractedBarcode, HaplotaggingBarcode, StandardBarcode, StlfrBarcode,
    TellseqBarcode, TenxBarcode,
};
use crate::runtime;

///////////////////////////////
/// The barcode encodings that can be found in linked-read FASTQ headers.
///
/// A stream is locked to one convention for its whole lifetime; `Unknown` is what detection
/// ends in when nothing matched, and extracts nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Convention {
    Canonical,
    Haplotagging,
    Stlfr,
    Tellseq,
    TenX,
    Unknown,
}

impl Convention {
    /// Order in which conventions are tried on a header. 10x-style headers are too generic to be
    /// told apart from plain Illumina names, so they are only ever chosen explicitly
    pub const DETECTION_ORDER: [Convention; 4] = [
        Convention::Canonical,
        Convention::Haplotagging,
        Convention::Stlfr,
        Convention::Tellseq,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Convention::Canonical => "canonical",
            Convention::Haplotagging => "haplotagging",
            Convention::Stlfr => "stlfr",
            Convention::Tellseq => "tellseq",
            Convention::TenX => "tenx",
            Convention::Unknown => "unknown",
        }
    }

    pub fn is_canonical(&self) -> bool {
        *self == Convention::Canonical
    }

    /// First convention, in detection order, whose grammar the header follows
    pub fn classify(header: &str) -> Option<Convention> {
        Convention::DETECTION_ORDER
            .into_iter()
            .find(|convention| convention.matches(header))
    }
}

impl BarcodeExtractor for Convention {
    fn extract<'h>(&self, header: &'h str) -> Option<ExtractedBarcode<'h>> {
        match self {
            Convention::Canonical => StandardBarcode.extract(header),
            Convention::Haplotagging => HaplotaggingBarcode.extract(header),
            Convention::Stlfr => StlfrBarcode.extract(header),
            Convention::Tellseq => TellseqBarcode.extract(header),
            Convention::TenX => TenxBarcode.extract(header),
            Convention::Unknown => None,
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Convention {
    type Err = runtime::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let convention = match s.to_lowercase().as_str() {
            "canonical" | "standard" => Convention::Canonical,
            "haplotagging" | "haplotag" => Convention::Haplotagging,
            "stlfr" => Convention::Stlfr,
            "tellseq" => Convention::Tellseq,
            "tenx" | "10x" => Convention::TenX,
            _ => {
                return Err(runtime::Error::parse_error(
                    "barcode convention",
                    Some(format!("unknown convention '{}'", s)),
                ))
            }
        };
        Ok(convention)
    }
}
