//! Filesystem reconciliation: find download entries no torrent claims.
//!
//! Each configured mapping pairs a directory as this process sees it with the
//! same directory as the torrent client sees it. Entries one level below the
//! local root are translated into the client's view by prefix replacement and
//! then matched against the content paths of every torrent in the snapshot.
//! Matching is loose substring containment, so a directory that holds a
//! torrent's payload deeper inside still counts as claimed.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use seedsweep_config::DirectoryMapping;
use tracing::{info, warn};
use walkdir::WalkDir;

/// One filesystem entry not claimed by any torrent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanEntry {
    /// Absolute local path of the entry.
    pub path: PathBuf,
    /// Recursive size of the entry in bytes.
    pub size: u64,
    /// Whether the entry was removed from disk during this pass.
    pub removed: bool,
}

/// Outcome of a reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// Orphaned entries found, deleted or not.
    pub orphans: Vec<OrphanEntry>,
    /// Total bytes occupied by the orphaned entries.
    pub total_bytes: u64,
    /// Entries actually removed from disk.
    pub deleted: usize,
    /// Deletion attempts that failed; the pass keeps going past them.
    pub failed_deletions: usize,
}

/// Reconcile the mapped directories against the snapshot's content paths.
///
/// When `delete` is set, orphans are removed best-effort: a failed removal is
/// logged and counted, never fatal.
#[must_use]
pub fn reconcile(
    mappings: &[DirectoryMapping],
    exclude_keywords: &[String],
    content_paths: &HashSet<String>,
    delete: bool,
) -> Reconciliation {
    let keywords: Vec<&str> = exclude_keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();

    let mut outcome = Reconciliation::default();
    for mapping in mappings {
        scan_mapping(mapping, &keywords, content_paths, delete, &mut outcome);
    }
    outcome
}

fn scan_mapping(
    mapping: &DirectoryMapping,
    keywords: &[&str],
    content_paths: &HashSet<String>,
    delete: bool,
    outcome: &mut Reconciliation,
) {
    let entries = match fs::read_dir(&mapping.local_root) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(
                root = %mapping.local_root,
                error = %err,
                "cannot list mapped directory, skipping"
            );
            return;
        }
    };

    for entry in entries {
        let Ok(entry) = entry else { continue };
        let path = entry.path();
        let local = path.to_string_lossy().to_string();

        if let Some(keyword) = keywords.iter().find(|k| {
            entry.file_name().to_string_lossy().contains(*k)
        }) {
            info!(path = %local, keyword, "exclusion keyword hit, skipping");
            continue;
        }

        let client_path = local.replacen(&mapping.local_root, &mapping.client_root, 1);
        let claimed = content_paths.iter().any(|content| content.contains(&client_path));
        if claimed {
            continue;
        }

        let size = entry_size(&path);
        info!(path = %local, size, "orphaned entry");
        outcome.total_bytes += size;

        let mut removed = false;
        if delete {
            match remove_entry(&path) {
                Ok(()) => {
                    removed = true;
                    outcome.deleted += 1;
                }
                Err(err) => {
                    warn!(path = %local, error = %err, "failed to remove orphaned entry");
                    outcome.failed_deletions += 1;
                }
            }
        }
        outcome.orphans.push(OrphanEntry { path, size, removed });
    }
}

/// Recursive on-disk size of a file or directory tree.
fn entry_size(path: &Path) -> u64 {
    if path.is_file() {
        return fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    }
    WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

fn remove_entry(path: &Path) -> std::io::Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
