pub mod error;
pub mod report;
pub mod scanner;
pub mod size;

pub use error::{DutopError, Result};
pub use report::{DirectoryEntry, ScanReport, SkipReason, SkippedDir};
pub use scanner::{ScanConfig, ScanMessage, ScanProgress, Scanner};
pub use size::{format_count, format_size, format_size_du};
