use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::Path;

use flate2::{read::MultiGzDecoder, write::GzEncoder, Compression};
use seq_io::fastq::Reader;
use tempfile::TempDir;

use linkedbx::barcode::Convention;
use linkedbx::command::{BatchShards, Standardize};
use linkedbx::common;
use linkedbx::fileformat::{self, BarcodeBatchReader, Error};
use linkedbx::runtime::{BatchConfig, DetectConfig, ReaderConfig};

fn write_plain(path: &Path, text: &str) {
    fs::write(path, text).unwrap();
}

fn write_gz(path: &Path, text: &str) {
    let mut encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

/// Read back a gzipped FASTQ as (header, sequence, quality) triples
fn read_gz_fastq(path: &Path) -> Vec<(String, String, String)> {
    let decoder = MultiGzDecoder::new(BufReader::new(File::open(path).unwrap()));
    Reader::new(decoder)
        .into_records()
        .map(|rec| {
            let rec = rec.unwrap();
            (
                String::from_utf8(rec.head).unwrap(),
                String::from_utf8(rec.seq).unwrap(),
                String::from_utf8(rec.qual).unwrap(),
            )
        })
        .collect()
}

fn haplotagging_reads(barcodes: &[&str], mate: u8) -> String {
    barcodes
        .iter()
        .enumerate()
        .map(|(i, bc)| format!("@hap{}/{}\tBX:Z:{}\nACGTAC\n+\nIIIIII\n", i, mate, bc))
        .collect()
}

#[test]
fn test_standardize_haplotagging_then_batch() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let barcodes = [
        "A01C01B01D01",
        "A01C01B01D01",
        "A01C01B01D01",
        "A02C00B01D01",
        "A03C05B07D09",
        "A03C05B07D09",
    ];
    let path_forward = dir.join("in.R1.fq.gz");
    let path_reverse = dir.join("in.R2.fq.gz");
    write_gz(&path_forward, &haplotagging_reads(&barcodes, 1));
    write_gz(&path_reverse, &haplotagging_reads(&barcodes, 2));

    let out = Standardize::new(path_forward, path_reverse, dir.join("out"))
        .run()
        .unwrap();
    assert!(out.rewritten);
    assert_eq!(out.convention, Convention::Haplotagging);
    assert_eq!(out.forward, dir.join("out").join(common::STANDARD_R1_FILENAME));
    assert_eq!(out.reverse, dir.join("out").join(common::STANDARD_R2_FILENAME));

    let forward = read_gz_fastq(&out.forward);
    let reverse = read_gz_fastq(&out.reverse);
    assert_eq!(forward.len(), 6);
    assert_eq!(reverse.len(), 6);
    assert_eq!(
        forward[0],
        (
            "hap0/1 BX:Z:A01C01B01D01 VX:i:1".to_string(),
            "ACGTAC".to_string(),
            "IIIIII".to_string()
        )
    );
    assert_eq!(forward[3].0, "hap3/1 BX:Z:A02C00B01D01 VX:i:0");
    assert_eq!(reverse[3].0, "hap3/2 BX:Z:A02C00B01D01 VX:i:0");

    // the rewritten files are canonical now and need no second pass
    let detection = fileformat::detect_convention_from_paths(
        &out.forward,
        &out.reverse,
        &DetectConfig::default(),
        &ReaderConfig::default(),
    )
    .unwrap();
    assert_eq!(detection.convention, Convention::Canonical);

    let mut reader = BarcodeBatchReader::from_readers(
        fileformat::open_fastq(&out.forward).unwrap(),
        fileformat::open_fastq(&out.reverse).unwrap(),
        BatchConfig::default(),
        &ReaderConfig::default(),
    );
    let mut sizes = Vec::new();
    let mut names = Vec::new();
    while let Some(batch) = reader.next_batch(None).unwrap() {
        sizes.push((String::from_utf8(batch.barcode().to_vec()).unwrap(), batch.len()));
        names.extend(batch.iter().map(|pair| pair.read_id.clone()));
    }
    assert_eq!(
        sizes,
        vec![
            ("A01C01B01D01".to_string(), 3),
            ("A02C00B01D01".to_string(), 1),
            ("A03C05B07D09".to_string(), 2)
        ]
    );
    assert_eq!(names, (0..6).map(|i| format!("hap{}", i)).collect::<Vec<_>>());
}

#[test]
fn test_standardize_stlfr_plain_input() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let path_forward = dir.join("in.R1.fq");
    let path_reverse = dir.join("in.R2.fq");
    // the first pairs carry no barcode, detection has to look past them
    let mut r1 = String::from("@plain1\nAC\n+\nII\n@plain2\nAC\n+\nII\n");
    let mut r2 = String::from("@plain1\nGT\n+\nII\n@plain2\nGT\n+\nII\n");
    r1.push_str("@V300:1#12_3_5/1\nAAAA\n+\nFFFF\n@V300:2#12_0_5/1\nCCCC\n+\nFFFF\n");
    r2.push_str("@V300:1#12_3_5/2\nTTTT\n+\nFFFF\n@V300:2#12_0_5/2\nGGGG\n+\nFFFF\n");
    write_plain(&path_forward, &r1);
    write_plain(&path_reverse, &r2);

    let out = Standardize::new(path_forward, path_reverse, dir.to_path_buf())
        .run()
        .unwrap();
    assert_eq!(out.convention, Convention::Stlfr);

    let heads: Vec<String> = read_gz_fastq(&out.forward)
        .into_iter()
        .map(|(head, _, _)| head)
        .collect();
    assert_eq!(
        heads,
        vec![
            "plain1/1 BX:Z: VX:i:0",
            "plain2/1 BX:Z: VX:i:0",
            "V300:1#12_3_5/1 BX:Z:12_3_5 VX:i:1",
            "V300:2#12_0_5/1 BX:Z:12_0_5 VX:i:0",
        ]
    );
}

#[test]
fn test_canonical_input_is_not_rewritten() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let path_forward = dir.join("in.R1.fq");
    let path_reverse = dir.join("in.R2.fq");
    let reads = |mate: u8| -> String {
        (0..50)
            .map(|i| format!("@r{}/{} BX:Z:ACGTACGT VX:i:1\nA\n+\nI\n", i, mate))
            .collect()
    };
    write_plain(&path_forward, &reads(1));
    write_plain(&path_reverse, &reads(2));

    let out_dir = dir.join("out");
    let out = Standardize::new(path_forward.clone(), path_reverse.clone(), out_dir.clone())
        .run()
        .unwrap();
    assert!(!out.rewritten);
    assert_eq!(out.convention, Convention::Canonical);
    assert_eq!(out.forward, path_forward);
    assert_eq!(out.reverse, path_reverse);
    assert!(!out_dir.exists());
}

#[test]
fn test_unknown_format_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let path_forward = dir.join("in.R1.fq");
    let path_reverse = dir.join("in.R2.fq");
    write_plain(&path_forward, "@a\nA\n+\nI\n@b\nC\n+\nI\n");
    write_plain(&path_reverse, "@a\nA\n+\nI\n@b\nC\n+\nI\n");

    let err = Standardize::new(path_forward, path_reverse, dir.join("out"))
        .run()
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::FormatUnknown { sampled: 2 })
    ));
}

#[test]
fn test_batch_shards_in_parallel() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let canonical = |barcodes: &[&str], mate: u8| -> String {
        barcodes
            .iter()
            .enumerate()
            .map(|(i, bc)| format!("@r{}/{} BX:Z:{} VX:i:1\nA\n+\nI\n", i, mate, bc))
            .collect()
    };
    let mut shards = Vec::new();
    for (i, barcodes) in [vec!["AAA", "AAA", "CCC"], vec!["GGG"], vec!["TTT", "TTT"]]
        .iter()
        .enumerate()
    {
        let path_forward = dir.join(format!("shard{}.R1.fq", i));
        let path_reverse = dir.join(format!("shard{}.R2.fq.gz", i));
        write_plain(&path_forward, &canonical(barcodes, 1));
        write_gz(&path_reverse, &canonical(barcodes, 2));
        shards.push((path_forward, path_reverse));
    }

    let summary = BatchShards {
        shards,
        config: BatchConfig::default(),
        reader: ReaderConfig::default(),
        num_threads: 2,
    }
    .run()
    .unwrap();

    let rows: Vec<(usize, usize, &str, usize)> = summary
        .iter()
        .map(|row| (row.shard, row.index, row.barcode.as_str(), row.records))
        .collect();
    assert_eq!(
        rows,
        vec![
            (0, 0, "AAA", 2),
            (0, 1, "CCC", 1),
            (1, 0, "GGG", 1),
            (2, 0, "TTT", 2)
        ]
    );
    assert!(summary.iter().all(|row| row.complete));
}
