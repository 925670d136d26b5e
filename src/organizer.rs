// SPDX-License-Identifier: MIT

//! Consolidate files of one extension into a single target folder
//!
//! Moves are sequential with no rollback. Per-file failures are collected
//! and reported in the final status string; they never abort the batch.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::finder::{absolutize, find_files, is_sentinel};

/// Outcome of a single organize run, flattened into the status string.
#[derive(Debug, Default)]
struct MoveResult {
    moved: usize,
    errors: Vec<String>,
}

impl MoveResult {
    fn summarize(&self, target_dir: &Path) -> String {
        let mut msg = format!(
            "Successfully moved {} files to {}.",
            self.moved,
            target_dir.display()
        );
        if !self.errors.is_empty() {
            msg.push_str(&format!("\nErrors encountered: {}", self.errors.join("; ")));
        }
        msg
    }
}

/// Move a file with rename semantics, falling back to copy-and-remove
/// when the rename fails (e.g. across filesystems).
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}

/// Pick a destination under `target_dir` for `filename`, appending `_1`,
/// `_2`, ... before the extension until the name is free.
fn resolve_collision(target_dir: &Path, filename: &str) -> PathBuf {
    let mut destination = target_dir.join(filename);
    if !destination.exists() {
        return destination;
    }

    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());

    let mut counter = 1;
    while destination.exists() {
        let candidate = match &ext {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };
        destination = target_dir.join(candidate);
        counter += 1;
    }
    destination
}

/// Move all files with the given extension from `source_path` (recursive)
/// into a folder named `target_folder_name` inside `source_path`.
///
/// Returns a human-readable status string. Find errors and the no-match
/// case are passed through unchanged; a failure to create the target
/// directory aborts the whole operation with nothing moved.
pub fn organize_files(
    extension: &str,
    source_path: &str,
    target_folder_name: &str,
    max_results: usize,
) -> String {
    info!(
        "Organizing: moving '.{}' files from '{}' into '{}'",
        extension, source_path, target_folder_name
    );

    let files_to_move = find_files(extension, source_path, max_results);

    // An empty list is treated as the no-match case rather than indexed.
    if is_sentinel(&files_to_move) {
        return files_to_move
            .into_iter()
            .next()
            .unwrap_or_else(|| format!("No files with extension .{} found", extension));
    }

    let target_dir = Path::new(source_path).join(target_folder_name);
    if !target_dir.is_dir() {
        if let Err(e) = fs::create_dir_all(&target_dir) {
            return format!("Failed to create target directory: {}", e);
        }
        info!("Created directory: {}", target_dir.display());
    }
    let abs_target = absolutize(&target_dir);

    let mut result = MoveResult::default();

    for file in &files_to_move {
        let file_path = Path::new(file);

        // Already sitting in the destination, leave it alone.
        if file_path.parent() == Some(abs_target.as_path()) {
            debug!("Skipping {} (already in target)", file);
            continue;
        }

        let filename = match file_path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => {
                result.errors.push(format!("Failed to move {}: no file name", file));
                continue;
            }
        };

        let destination = resolve_collision(&target_dir, &filename);

        match move_file(file_path, &destination) {
            Ok(()) => {
                result.moved += 1;
                info!("Moved: {}", filename);
            }
            Err(e) => {
                result.errors.push(format!("Failed to move {}: {}", filename, e));
            }
        }
    }

    result.summarize(&target_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_moves_all_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.txt"));
        touch(&dir.path().join("b.txt"));

        let status = organize_files("txt", dir.path().to_str().unwrap(), "Archive", 50);

        assert!(status.starts_with("Successfully moved 2 files"));
        assert!(dir.path().join("Archive/a.txt").exists());
        assert!(dir.path().join("Archive/b.txt").exists());
        assert!(!dir.path().join("a.txt").exists());
        assert!(!dir.path().join("b.txt").exists());
    }

    #[test]
    fn test_second_run_skips_files_already_in_target() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.txt"));

        let source = dir.path().to_str().unwrap();
        organize_files("txt", source, "Archive", 50);
        let status = organize_files("txt", source, "Archive", 50);

        // The recursive search finds the archived file again; it is skipped.
        assert!(status.starts_with("Successfully moved 0 files"));
        assert!(dir.path().join("Archive/a.txt").exists());
        assert!(!dir.path().join("Archive/a_1.txt").exists());
    }

    #[test]
    fn test_name_collision_gets_numeric_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::create_dir(dir.path().join("Archive")).unwrap();
        fs::write(dir.path().join("Archive/a.txt"), b"original").unwrap();
        fs::write(sub.join("a.txt"), b"incoming").unwrap();

        let status = organize_files("txt", dir.path().to_str().unwrap(), "Archive", 50);

        assert!(status.starts_with("Successfully moved 1 files"));
        assert_eq!(
            fs::read(dir.path().join("Archive/a.txt")).unwrap(),
            b"original"
        );
        assert_eq!(
            fs::read(dir.path().join("Archive/a_1.txt")).unwrap(),
            b"incoming"
        );
    }

    #[test]
    fn test_repeated_collisions_increment_counter() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("Archive");
        fs::create_dir(&target).unwrap();
        touch(&target.join("a.txt"));
        touch(&target.join("a_1.txt"));

        let destination = resolve_collision(&target, "a.txt");
        assert_eq!(destination, target.join("a_2.txt"));
    }

    #[test]
    fn test_no_matches_passes_sentinel_through() {
        let dir = tempfile::tempdir().unwrap();

        let status = organize_files("pdf", dir.path().to_str().unwrap(), "Archive", 50);

        assert!(status.starts_with("No files with extension .pdf"));
        assert!(!dir.path().join("Archive").exists());
    }

    #[test]
    fn test_target_creation_failure_aborts() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.txt"));
        // A file standing where the target directory should go.
        touch(&dir.path().join("Archive"));

        let status = organize_files("txt", dir.path().to_str().unwrap(), "Archive", 50);

        assert!(status.starts_with("Failed to create target directory:"));
        assert!(dir.path().join("a.txt").exists());
    }
}
