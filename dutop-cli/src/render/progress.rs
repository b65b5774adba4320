use std::io::{self, IsTerminal, Write};

use dutop_core::{ScanProgress, format_count, format_size};

/// Scan progress as a single stderr line, overwritten in place.
/// Stays silent when stderr is not a terminal.
pub struct ProgressLine {
    enabled: bool,
}

impl ProgressLine {
    pub fn new() -> Self {
        Self {
            enabled: io::stderr().is_terminal(),
        }
    }

    pub fn update(&self, progress: &ScanProgress) {
        if !self.enabled {
            return;
        }

        let mut line = format!(
            "{} entries, {}",
            format_count(progress.total_entries()),
            format_size(progress.bytes_scanned)
        );
        if progress.errors > 0 {
            line.push_str(&format!(", {} errors", format_count(progress.errors)));
        }
        self.redraw(&line);
    }

    pub fn finalizing(&self) {
        if self.enabled {
            self.redraw("finalizing...");
        }
    }

    /// Erase the line so the report starts on a clean row
    pub fn clear(&self) {
        if self.enabled {
            self.redraw("");
        }
    }

    fn redraw(&self, line: &str) {
        let mut err = io::stderr();
        let _ = write!(err, "\r\x1b[2K{line}");
        let _ = err.flush();
    }
}

impl Default for ProgressLine {
    fn default() -> Self {
        Self::new()
    }
}
