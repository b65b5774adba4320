use std::io::{self, Write};

use dutop_core::{ScanReport, format_size_du};

/// Indented listing of every reported directory, largest first.
///
/// Indentation tracks path depth, not rank: a deep directory can sit between
/// two shallow ones when its raw byte size falls between theirs.
pub fn render_tree<W: Write>(out: &mut W, report: &ScanReport, min_size: u64) -> io::Result<()> {
    for entry in report.entries.iter().filter(|e| e.size >= min_size) {
        writeln!(
            out,
            "{}{:<8} {}",
            "  ".repeat(entry.depth),
            format_size_du(entry.size),
            entry.path.display()
        )?;
    }
    Ok(())
}
