use lazy_static::lazy_static;
use regex::Regex;

use crate::barcode::{BarcodeExtractor, ExtractedBarcode, Validity};

lazy_static! {
    // ":ACGT..." right before whitespace. End of header counts as whitespace (the line break)
    static ref TELLSEQ_RE: Regex = Regex::new(r":([ACGTN]+)(?:\s|$)").unwrap();
}

///////////////////////////////
/// TELL-seq: the barcode sequence is appended to the read name after a colon.
/// An N means an ambiguous base call in the barcode read
#[derive(Debug, Clone, Copy, Default)]
pub struct TellseqBarcode;

impl BarcodeExtractor for TellseqBarcode {
    fn extract<'h>(&self, header: &'h str) -> Option<ExtractedBarcode<'h>> {
        let caps = TELLSEQ_RE.captures(header)?;
        let barcode = caps.get(1)?.as_str();
        let validity = Validity::from_flag(!barcode.contains('N'));
        Some(ExtractedBarcode::new(barcode, validity))
    }
}
