pub mod chemistry;
pub mod convention;
pub mod haplotagging;
pub mod standard;
pub mod stlfr;
pub mod tellseq;
pub mod tenx;

pub use chemistry::BarcodeExtractor;
pub use chemistry::ExtractedBarcode;
pub use chemistry::Validity;
pub use convention::Convention;

pub use haplotagging::HaplotaggingBarcode;
pub use standard::StandardBarcode;
pub use stlfr::StlfrBarcode;
pub use tellseq::TellseqBarcode;
pub use tenx::TenxBarcode;
