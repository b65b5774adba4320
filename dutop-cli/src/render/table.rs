use std::io::{self, Write};

use dutop_core::ScanReport;

const MB: u64 = 1024 * 1024;

/// Fixed-width leaderboard of the largest directories. Sizes are whole
/// megabytes, truncating division (a 2,000,000 byte directory prints as 1).
pub fn render_table<W: Write>(
    out: &mut W,
    report: &ScanReport,
    top: usize,
    min_size: u64,
) -> io::Result<()> {
    writeln!(out, "{:>9}  {}", "SIZE (MB)", "DIRECTORY")?;
    for entry in report
        .entries
        .iter()
        .filter(|e| e.size >= min_size)
        .take(top)
    {
        writeln!(out, "{:>9}  {}", entry.size / MB, entry.path.display())?;
    }
    Ok(())
}
