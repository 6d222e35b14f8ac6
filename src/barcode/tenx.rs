use lazy_static::lazy_static;
use regex::Regex;

use crate::barcode::{BarcodeExtractor, ExtractedBarcode, Validity};
use crate::common;

lazy_static! {
    // Barcode sequence, optionally with the GEM group suffix ("-1")
    static ref TENX_RE: Regex = Regex::new(r"^[ACGTN]+(?:-\d+)?$").unwrap();
}

///////////////////////////////
/// 10x-style headers keep the barcode as the first comma-separated item of the last header
/// field, e.g. "@read1 1:N:0 ACGTACGTACGTACGT,AAFFFJJJ". Validity is never encoded
#[derive(Debug, Clone, Copy, Default)]
pub struct TenxBarcode;

impl BarcodeExtractor for TenxBarcode {
    fn extract<'h>(&self, header: &'h str) -> Option<ExtractedBarcode<'h>> {
        let mut fields = header.split_ascii_whitespace();
        fields.next()?;
        let last = fields.last()?;
        let last = last.strip_prefix(common::TAG_BARCODE).unwrap_or(last);
        let barcode = last.split(',').next()?;
        if TENX_RE.is_match(barcode) {
            Some(ExtractedBarcode::new(barcode, Validity::Unknown))
        } else {
            None
        }
    }
}
