mod render;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use dutop_core::{ScanConfig, ScanMessage, Scanner};

use render::{ProgressLine, render_table, render_tree};

const MB: u64 = 1024 * 1024;

/// DUTOP - Directory Size Leaderboard
#[derive(Parser, Debug)]
#[command(name = "dutop")]
#[command(about = "Rank directories by disk usage and print a leaderboard")]
#[command(version)]
struct Args {
    /// Path to analyze (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Deepest directory level to report
    #[arg(short = 'd', long)]
    max_depth: Option<usize>,

    /// Include hidden directories and files
    #[arg(short = 'a', long)]
    hidden: bool,

    /// Show only the N largest directories as a fixed-width table
    #[arg(
        short,
        long,
        value_name = "N",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "10"
    )]
    top: Option<usize>,

    /// Hide directories smaller than this many megabytes
    #[arg(short, long, value_name = "MB")]
    min_size: Option<u64>,

    /// Follow symbolic links
    #[arg(short, long)]
    follow_symlinks: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let config = ScanConfig {
        follow_symlinks: args.follow_symlinks,
        max_depth: args.max_depth,
        include_hidden: args.hidden,
        num_threads: 0,
    };

    let (progress_rx, scan_handle) = Scanner::new(config).scan(args.path)?;

    let progress_line = ProgressLine::new();
    for msg in &progress_rx {
        match msg {
            ScanMessage::Progress(progress) => progress_line.update(&progress),
            ScanMessage::Finalizing => progress_line.finalizing(),
            ScanMessage::Completed => break,
        }
    }

    let report = scan_handle
        .join()
        .map_err(|_| eyre!("scan worker panicked"))?;
    progress_line.clear();

    let min_size = args.min_size.unwrap_or(0).saturating_mul(MB);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.top {
        Some(n) => render_table(&mut out, &report, n, min_size)?,
        None => render_tree(&mut out, &report, min_size)?,
    }
    out.flush()?;

    // Skips were collected during the walk; whether to surface them is
    // decided here, once, and stdout stays report-only.
    for skip in &report.skipped {
        eprintln!("dutop: cannot read {}: {}", skip.path.display(), skip.reason);
    }

    Ok(())
}
