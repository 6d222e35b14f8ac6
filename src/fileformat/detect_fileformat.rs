use std::io::BufRead;
use std::path::Path;

use anyhow::Context;
use log::{debug, info};

use crate::barcode::Convention;
use crate::fileformat::{open_fastq, Error, PairedFastqCursor};
use crate::runtime;
use crate::runtime::{DetectConfig, ReaderConfig};

///////////////////////////////
/// Outcome of sampling the start of a paired FASTQ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub convention: Convention,
    pub pairs_sampled: usize,
}

impl Detection {
    /// Unknown is terminal, it never falls back to some default convention
    pub fn into_convention(self) -> Result<Convention, Error> {
        match self.convention {
            Convention::Unknown => Err(Error::FormatUnknown {
                sampled: self.pairs_sampled,
            }),
            convention => Ok(convention),
        }
    }
}

///////////////////////////////
/// Look at up to `sample_size` pairs from the start of the input and return the first
/// convention that any forward header follows, trying them in `Convention::DETECTION_ORDER`.
///
/// The readers are consumed; actual processing must reopen the input.
pub fn detect_convention<R1: BufRead, R2: BufRead>(
    forward: R1,
    reverse: R2,
    config: &DetectConfig,
    reader_config: &ReaderConfig,
) -> Result<Detection, Error> {
    let mut cursor =
        PairedFastqCursor::with_config(forward, reverse, Convention::Unknown, reader_config);

    while cursor.num_pairs() < config.sample_size {
        let Some(pair) = cursor.next_pair()? else {
            debug!("Input ended after {} pairs during detection", cursor.num_pairs());
            break;
        };
        if let Some(convention) = Convention::classify(pair.forward.header()) {
            info!(
                "Detected {} barcodes (read pair {}, header {})",
                convention,
                cursor.num_pairs(),
                pair.forward.header()
            );
            return Ok(Detection {
                convention,
                pairs_sampled: cursor.num_pairs(),
            });
        }
    }

    info!(
        "No known barcode convention in the first {} read pairs",
        cursor.num_pairs()
    );
    Ok(Detection {
        convention: Convention::Unknown,
        pairs_sampled: cursor.num_pairs(),
    })
}

/// Detection on a pair of files, opened just for the sampling
pub fn detect_convention_from_paths(
    path_forward: &Path,
    path_reverse: &Path,
    config: &DetectConfig,
    reader_config: &ReaderConfig,
) -> anyhow::Result<Detection> {
    let forward = open_fastq(path_forward)?;
    let reverse = open_fastq(path_reverse)?;
    detect_convention(forward, reverse, config, reader_config).with_context(|| {
        format!(
            "Failed to identify the barcode format of {} and {}",
            path_forward.display(),
            path_reverse.display()
        )
    })
}

/////// Check that the specified file is a FASTQ file
pub fn verify_input_fq_file(path_in: &Path) -> Result<(), runtime::Error> {
    let name = path_in
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let is_fastq = [".fq.gz", ".fastq.gz", ".fq", ".fastq", ".fq.bgz", ".fastq.bgz"]
        .iter()
        .any(|ext| name.ends_with(ext));
    if !is_fastq {
        return Err(runtime::Error::file_not_valid(
            path_in,
            Some("input file must be a fastq file"),
        ));
    }
    if !path_in.is_file() {
        return Err(runtime::Error::file_not_found(path_in));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn detect(r1: String, r2: String) -> Result<Detection, Error> {
        detect_convention(
            Cursor::new(r1.into_bytes()),
            Cursor::new(r2.into_bytes()),
            &DetectConfig::default(),
            &ReaderConfig::default(),
        )
    }

    fn records(header: &str, n: usize) -> String {
        (0..n)
            .map(|i| format!("@read{}{}\nACGT\n+\nIIII\n", i, header))
            .collect()
    }

    #[test]
    fn test_detect_canonical() {
        let d = detect(
            records(" BX:Z:ACGTACGT VX:i:1", 50),
            records(" BX:Z:ACGTACGT VX:i:1", 50),
        )
        .unwrap();
        assert_eq!(d.convention, Convention::Canonical);
        assert_eq!(d.pairs_sampled, 1);
    }

    #[test]
    fn test_detect_after_unrecognized_headers() {
        let r1 = records("", 10) + &records("#5_6_7/1", 5);
        let r2 = records("", 10) + &records("#5_6_7/2", 5);
        let d = detect(r1, r2).unwrap();
        assert_eq!(d.convention, Convention::Stlfr);
        assert_eq!(d.pairs_sampled, 11);
    }

    #[test]
    fn test_detect_haplotagging_and_tellseq() {
        let d = detect(records(" BX:Z:A01C02B03D04", 3), records("", 3)).unwrap();
        assert_eq!(d.convention, Convention::Haplotagging);

        let d = detect(records(":ACGTNACGT 1:N:0", 3), records("", 3)).unwrap();
        assert_eq!(d.convention, Convention::Tellseq);
    }

    #[test]
    fn test_detect_unknown_is_an_error() {
        let d = detect(records(" 1:N:0", 250), records(" 2:N:0", 250)).unwrap();
        assert_eq!(d.convention, Convention::Unknown);
        assert_eq!(d.pairs_sampled, 200);
        let err = d.into_convention().unwrap_err();
        assert!(matches!(err, Error::FormatUnknown { sampled: 200 }));
    }

    #[test]
    fn test_detect_short_input() {
        let d = detect(records("", 3), records("", 3)).unwrap();
        assert_eq!(d.convention, Convention::Unknown);
        assert_eq!(d.pairs_sampled, 3);
    }

    #[test]
    fn test_detect_surfaces_desync() {
        let err = detect(records("", 3), records("", 2)).unwrap_err();
        assert!(matches!(err, Error::Desync { .. }));
    }

    #[test]
    fn test_verify_input_fq_file() {
        assert!(matches!(
            verify_input_fq_file(Path::new("reads.bam")),
            Err(runtime::Error::FileNotValid { .. })
        ));
        assert!(matches!(
            verify_input_fq_file(Path::new("/nonexistent/reads.R1.fq.gz")),
            Err(runtime::Error::FileNotFound { .. })
        ));
    }
}
