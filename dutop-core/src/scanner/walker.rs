use std::collections::{HashMap, HashSet};
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::JoinHandle;

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

use crossbeam_channel::{Receiver, Sender};
use jwalk::WalkDir;

use super::progress::{ScanMessage, ScanProgress};
use crate::error::{DutopError, Result};
use crate::report::{DirectoryEntry, ScanReport, SkipReason, SkippedDir, rank_by_size};

/// Scanner configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Follow symbolic links
    pub follow_symlinks: bool,
    /// Deepest directory level to report (None = unlimited). Sizes always
    /// account for the full subtree, only reporting is bounded.
    pub max_depth: Option<usize>,
    /// Report dot-named directories and count dot-named files
    pub include_hidden: bool,
    /// Number of parallel threads (0 = auto)
    pub num_threads: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            max_depth: None,
            include_hidden: false,
            num_threads: 0, // auto
        }
    }
}

/// Shared progress state for heartbeat updates
struct SharedProgress {
    files_scanned: AtomicU64,
    dirs_scanned: AtomicU64,
    bytes_scanned: AtomicU64,
    errors: AtomicU64,
    done: AtomicBool,
}

impl SharedProgress {
    fn new() -> Self {
        Self {
            files_scanned: AtomicU64::new(0),
            dirs_scanned: AtomicU64::new(0),
            bytes_scanned: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            done: AtomicBool::new(false),
        }
    }

    fn to_scan_progress(&self) -> ScanProgress {
        ScanProgress {
            files_scanned: self.files_scanned.load(Ordering::Relaxed),
            dirs_scanned: self.dirs_scanned.load(Ordering::Relaxed),
            bytes_scanned: self.bytes_scanned.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// One directory seen during the walk. Parents are recorded before their
/// children, which is what the bottom-up aggregation pass relies on.
struct DirRecord {
    path: PathBuf,
    parent: Option<usize>,
    depth: usize,
    bytes: u64,
}

/// Filesystem scanner
pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scan a directory tree and rank every directory by recursive size.
    /// Returns a receiver for progress updates and spawns scanning in
    /// background. Fails up front if the root cannot be resolved.
    pub fn scan(
        self,
        root_path: PathBuf,
    ) -> Result<(Receiver<ScanMessage>, JoinHandle<ScanReport>)> {
        let metadata = match std::fs::metadata(&root_path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(DutopError::PathNotFound(root_path));
            }
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_dir() {
            return Err(DutopError::NotADirectory(root_path));
        }
        let root_path = root_path.canonicalize().unwrap_or(root_path);

        let (tx, rx) = crossbeam_channel::unbounded();

        let handle = std::thread::spawn(move || self.scan_sync(root_path, tx));

        Ok((rx, handle))
    }

    /// Synchronous scan (runs in thread)
    fn scan_sync(self, root_path: PathBuf, tx: Sender<ScanMessage>) -> ScanReport {
        let mut records = vec![DirRecord {
            path: root_path.clone(),
            parent: None,
            depth: 0,
            bytes: 0,
        }];

        // Map from path to record index for parent lookups
        let mut path_to_idx: HashMap<PathBuf, usize> = HashMap::new();
        path_to_idx.insert(root_path.clone(), 0);

        let mut skipped: Vec<SkippedDir> = Vec::new();

        // Shared progress state
        let shared_progress = Arc::new(SharedProgress::new());
        let progress_for_heartbeat = Arc::clone(&shared_progress);
        let tx_for_heartbeat = tx.clone();

        // Spawn heartbeat thread that sends progress every 100ms
        let heartbeat_handle = std::thread::spawn(move || {
            while !progress_for_heartbeat.done.load(Ordering::Relaxed) {
                std::thread::sleep(std::time::Duration::from_millis(100));
                let progress = progress_for_heartbeat.to_scan_progress();
                let _ = tx_for_heartbeat.send(ScanMessage::Progress(progress));
            }
        });

        // The walk is never depth-bounded: a shallow directory's total must
        // include arbitrarily deep descendants. Sorted traversal keeps the
        // order deterministic, so equal-size entries rank identically
        // between runs.
        let walker = WalkDir::new(&root_path)
            .skip_hidden(!self.config.include_hidden)
            .follow_links(self.config.follow_symlinks)
            .sort(true);

        let walker = if self.config.num_threads > 0 {
            walker.parallelism(jwalk::Parallelism::RayonNewPool(self.config.num_threads))
        } else {
            walker
        };

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    // A directory whose contents cannot be read is dropped
                    // from the report; the walk continues with its siblings.
                    shared_progress.errors.fetch_add(1, Ordering::Relaxed);
                    if let Some(path) = err.path() {
                        skipped.push(SkippedDir {
                            path: path.to_path_buf(),
                            reason: skip_reason(&err),
                        });
                    }
                    continue;
                }
            };

            let path = entry.path();

            // Root record was added up front
            if path == root_path {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(_) => {
                    shared_progress.errors.fetch_add(1, Ordering::Relaxed);
                    continue;
                }
            };

            // Parents are always yielded before their children
            let parent_idx = match path.parent().and_then(|p| path_to_idx.get(p)) {
                Some(&idx) => idx,
                None => continue,
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                let depth = records[parent_idx].depth + 1;
                let idx = records.len();
                records.push(DirRecord {
                    path: path.clone(),
                    parent: Some(parent_idx),
                    depth,
                    bytes: 0,
                });
                path_to_idx.insert(path, idx);
                shared_progress.dirs_scanned.fetch_add(1, Ordering::Relaxed);
            } else if file_type.is_file() {
                // Only regular files count; symlinks never do
                let size = get_disk_usage(&metadata);
                records[parent_idx].bytes += size;
                shared_progress.files_scanned.fetch_add(1, Ordering::Relaxed);
                shared_progress.bytes_scanned.fetch_add(size, Ordering::Relaxed);
            }
        }

        // Stop heartbeat thread
        shared_progress.done.store(true, Ordering::Relaxed);
        let _ = heartbeat_handle.join();

        // Send finalizing message (aggregation can take time on large trees)
        let _ = tx.send(ScanMessage::Finalizing);

        // Children sit after their parents, so one reverse pass rolls every
        // directory's bytes up into all of its ancestors.
        for i in (1..records.len()).rev() {
            if let Some(parent) = records[i].parent {
                let bytes = records[i].bytes;
                records[parent].bytes += bytes;
            }
        }

        let skipped_paths: HashSet<&Path> = skipped.iter().map(|s| s.path.as_path()).collect();
        let max_depth = self.config.max_depth.unwrap_or(usize::MAX);
        let mut entries: Vec<DirectoryEntry> = records
            .iter()
            .filter(|r| r.depth <= max_depth && !skipped_paths.contains(r.path.as_path()))
            .map(|r| DirectoryEntry {
                path: r.path.clone(),
                size: r.bytes,
                depth: r.depth,
            })
            .collect();
        rank_by_size(&mut entries);

        // Send final progress
        let progress = shared_progress.to_scan_progress();
        let _ = tx.send(ScanMessage::Progress(progress));
        let _ = tx.send(ScanMessage::Completed);

        ScanReport {
            root_path,
            entries,
            skipped,
        }
    }
}

fn skip_reason(err: &jwalk::Error) -> SkipReason {
    match err.io_error().map(io::Error::kind) {
        Some(io::ErrorKind::PermissionDenied) => SkipReason::PermissionDenied,
        _ => SkipReason::ReadFailed,
    }
}

/// Get actual disk usage for a file (accounts for sparse files and block size)
#[cfg(unix)]
fn get_disk_usage(metadata: &Metadata) -> u64 {
    // st_blocks is in 512-byte units
    metadata.blocks() * 512
}

/// Get actual disk usage for a file (Windows fallback - uses file size)
#[cfg(not(unix))]
fn get_disk_usage(metadata: &Metadata) -> u64 {
    metadata.len()
}
