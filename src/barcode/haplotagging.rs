use lazy_static::lazy_static;
use regex::Regex;

use crate::barcode::{BarcodeExtractor, ExtractedBarcode, Validity};

lazy_static! {
    // AxxCxxBxxDxx, possibly already inside a BX tag
    static ref HAPLOTAG_RE: Regex =
        Regex::new(r"^(?:BX:Z:)?(A(\d{2})C(\d{2})B(\d{2})D(\d{2}))$").unwrap();
}

///////////////////////////////
/// Haplotagging beadTag: A, C, B and D segments with two digits each.
/// Segment "00" means the segment could not be resolved
#[derive(Debug, Clone, Copy, Default)]
pub struct HaplotaggingBarcode;

impl BarcodeExtractor for HaplotaggingBarcode {
    fn extract<'h>(&self, header: &'h str) -> Option<ExtractedBarcode<'h>> {
        header.split_ascii_whitespace().find_map(|field| {
            let caps = HAPLOTAG_RE.captures(field)?;
            let barcode = caps.get(1)?.as_str();
            let resolved = (2..=5).all(|i| caps.get(i).map_or(false, |m| m.as_str() != "00"));
            Some(ExtractedBarcode::new(barcode, Validity::from_flag(resolved)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haplotag_validity() {
        let bc = HaplotaggingBarcode.extract("read1 BX:Z:A12C00B05D03").unwrap();
        assert_eq!(bc.barcode, "A12C00B05D03");
        assert_eq!(bc.validity, Validity::Invalid);

        let bc = HaplotaggingBarcode.extract("read1 BX:Z:A12C01B05D03").unwrap();
        assert_eq!(bc.validity, Validity::Valid);
    }

    #[test]
    fn test_haplotag_zero_digits_across_segments_are_fine() {
        // "10C01" contains no unresolved segment even though digits 0 sit next to each other
        let bc = HaplotaggingBarcode.extract("read1 A10C01B20D30").unwrap();
        assert_eq!(bc.validity, Validity::Valid);
    }

    #[test]
    fn test_haplotag_no_match() {
        assert!(HaplotaggingBarcode.extract("read1 BX:Z:A1C01B05D03").is_none());
        assert!(HaplotaggingBarcode.extract("read1 BX:Z:ACGTACGT").is_none());
        assert!(HaplotaggingBarcode.extract("read1 xA12C01B05D03").is_none());
    }
}
