/// Progress update during scanning
#[derive(Debug, Clone)]
pub enum ScanMessage {
    /// Progress update
    Progress(ScanProgress),
    /// Finalizing (aggregating sizes, ranking)
    Finalizing,
    /// Scan completed
    Completed,
}

/// Scanning progress statistics
#[derive(Debug, Clone, Default)]
pub struct ScanProgress {
    /// Number of files scanned
    pub files_scanned: u64,
    /// Number of directories scanned
    pub dirs_scanned: u64,
    /// Total bytes scanned so far
    pub bytes_scanned: u64,
    /// Number of errors encountered
    pub errors: u64,
}

impl ScanProgress {
    pub fn total_entries(&self) -> u64 {
        self.files_scanned + self.dirs_scanned
    }
}
