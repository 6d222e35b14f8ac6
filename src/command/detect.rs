use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::common;
use crate::fileformat;
use crate::runtime::{DetectConfig, ReaderConfig};

/// Commandline option: Report which barcode convention a pair of FASTQ files uses
#[derive(Args)]
pub struct DetectCMD {
    // FASTQ for r1
    #[arg(long = "r1", value_parser)]
    pub path_forward: PathBuf,

    // FASTQ for r2
    #[arg(long = "r2", value_parser)]
    pub path_reverse: PathBuf,

    // Number of read pairs to sample
    #[arg(long = "sample-size", value_parser = clap::value_parser!(usize), default_value_t = common::DEFAULT_DETECT_SAMPLE_SIZE)]
    pub sample_size: usize,
}

impl DetectCMD {
    /// Run the commandline option
    pub fn try_execute(&mut self) -> Result<()> {
        fileformat::verify_input_fq_file(&self.path_forward)?;
        fileformat::verify_input_fq_file(&self.path_reverse)?;

        let detection = fileformat::detect_convention_from_paths(
            &self.path_forward,
            &self.path_reverse,
            &DetectConfig {
                sample_size: self.sample_size,
            },
            &ReaderConfig::default(),
        )?;
        println!("{}", detection.convention);
        Ok(())
    }
}
