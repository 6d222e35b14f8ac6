use crate::barcode::{BarcodeExtractor, ExtractedBarcode, Validity};
use crate::common;

///////////////////////////////
/// The canonical format: "BX:Z:<barcode>" and "VX:i:<0|1>" as separate header fields.
///
/// This is a direct lookup; both tags must be present. An empty BX value is allowed, it marks
/// a read pair for which no barcode could be found upstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardBarcode;

impl BarcodeExtractor for StandardBarcode {
    fn extract<'h>(&self, header: &'h str) -> Option<ExtractedBarcode<'h>> {
        let mut barcode = None;
        let mut validity = None;
        for field in header.split_ascii_whitespace() {
            if barcode.is_none() {
                if let Some(bc) = field.strip_prefix(common::TAG_BARCODE) {
                    barcode = Some(bc);
                    continue;
                }
            }
            if validity.is_none() {
                validity = match field.strip_prefix(common::TAG_BARCODE_VALID) {
                    Some("1") => Some(Validity::Valid),
                    Some("0") => Some(Validity::Invalid),
                    _ => None,
                };
            }
        }
        Some(ExtractedBarcode::new(barcode?, validity?))
    }
}
