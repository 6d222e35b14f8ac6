use lazy_static::lazy_static;
use regex::Regex;

use crate::barcode::{BarcodeExtractor, ExtractedBarcode, Validity};

lazy_static! {
    // "#X_Y_Z" closing the read name; stLFR names often carry a /1 or /2 mate suffix
    static ref STLFR_RE: Regex = Regex::new(r"#((\d+)_(\d+)_(\d+))(?:/[12])?$").unwrap();
}

///////////////////////////////
/// stLFR barcode: three integers, one per ligation round. 0 means the round was not resolved
#[derive(Debug, Clone, Copy, Default)]
pub struct StlfrBarcode;

fn is_zero(digits: &str) -> bool {
    digits.bytes().all(|b| b == b'0')
}

impl BarcodeExtractor for StlfrBarcode {
    fn extract<'h>(&self, header: &'h str) -> Option<ExtractedBarcode<'h>> {
        header.split_ascii_whitespace().find_map(|field| {
            let caps = STLFR_RE.captures(field)?;
            let barcode = caps.get(1)?.as_str();
            let resolved = (2..=4).all(|i| caps.get(i).map_or(false, |m| !is_zero(m.as_str())));
            Some(ExtractedBarcode::new(barcode, Validity::from_flag(resolved)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stlfr_validity() {
        let bc = StlfrBarcode.extract("V300012345L1C001R0010000001#12_0_5").unwrap();
        assert_eq!(bc.barcode, "12_0_5");
        assert_eq!(bc.validity, Validity::Invalid);

        let bc = StlfrBarcode.extract("V300012345L1C001R0010000001#12_3_5").unwrap();
        assert_eq!(bc.barcode, "12_3_5");
        assert_eq!(bc.validity, Validity::Valid);
    }

    #[test]
    fn test_stlfr_mate_suffix_and_comment() {
        let bc = StlfrBarcode
            .extract("CL100:1:1#1024_33_1502/1 1:N:0")
            .unwrap();
        assert_eq!(bc.barcode, "1024_33_1502");
        assert_eq!(bc.validity, Validity::Valid);

        // 10 is not an unresolved round
        let bc = StlfrBarcode.extract("r#10_20_30/2").unwrap();
        assert_eq!(bc.validity, Validity::Valid);
        let bc = StlfrBarcode.extract("r#00_20_30").unwrap();
        assert_eq!(bc.validity, Validity::Invalid);
    }

    #[test]
    fn test_stlfr_no_match() {
        assert!(StlfrBarcode.extract("read1 BX:Z:A12C01B05D03").is_none());
        assert!(StlfrBarcode.extract("read1#12_3").is_none());
        assert!(StlfrBarcode.extract("read1#12_3_5x").is_none());
    }
}
