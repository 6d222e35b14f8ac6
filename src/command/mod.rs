pub mod batch;
pub mod detect;
pub mod standardize;
pub mod threadcount;

pub use batch::BatchCMD;
pub use batch::BatchSummary;
pub use batch::BatchShards;

pub use detect::DetectCMD;

pub use standardize::Standardize;
pub use standardize::StandardizeCMD;
pub use standardize::StandardizeSummary;
pub use standardize::StandardizedPaths;
pub use standardize::StandardizingWriter;

pub use threadcount::determine_thread_count;
