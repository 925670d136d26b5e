// SPDX-License-Identifier: MIT

//! Recursive file search by extension
//!
//! Results are returned as a list of absolute path strings. Error and
//! empty conditions are encoded as a single-element sentinel list so the
//! model can narrate them directly ("Error during search: ..." /
//! "No files with extension ...").

use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Normalize a user-supplied extension: lowercase, no leading dots.
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().to_lowercase().trim_start_matches('.').to_string()
}

/// Make a path absolute without touching the filesystem.
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

/// Whether a search root looks like an entire drive or volume.
///
/// Trailing separators are trimmed first; a Windows volume root ends in
/// ':' after trimming, a POSIX root trims down to nothing.
fn is_volume_root(search_path: &str) -> bool {
    let trimmed = search_path.trim_end_matches(['/', '\\']);
    trimmed.ends_with(':') || trimmed.is_empty()
}

/// Find all files with the given extension under `search_path`, recursively.
///
/// Collects absolute paths in traversal order until the tree is exhausted
/// or `max_results` matches are found, whichever comes first. On hitting
/// the cap the traversal stops early; the truncation is announced on the
/// console only.
pub fn find_files(extension: &str, search_path: &str, max_results: usize) -> Vec<String> {
    info!("Searching for '{}' files in '{}'", extension, search_path);

    let ext = normalize_extension(extension);
    if ext.is_empty() {
        return vec!["Error during search: no file extension given".to_string()];
    }

    if is_volume_root(search_path) {
        warn!(
            "Scanning entire volume {} - this might take a while",
            search_path
        );
    }

    let pattern = Path::new(search_path)
        .join(format!("**/*.{}", ext))
        .to_string_lossy()
        .into_owned();

    let paths = match glob::glob(&pattern) {
        Ok(paths) => paths,
        Err(e) => return vec![format!("Error during search: {}", e)],
    };

    let mut found = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => {
                found.push(absolutize(&path).to_string_lossy().into_owned());
                if found.len() >= max_results {
                    info!(
                        "Found {}+ files, stopping search to keep output manageable",
                        max_results
                    );
                    break;
                }
            }
            Err(e) => return vec![format!("Error during search: {}", e)],
        }
    }

    if found.is_empty() {
        return vec![format!(
            "No files with extension .{} found in {}",
            ext, search_path
        )];
    }

    info!("Found {} files", found.len());
    found
}

/// Whether a find result is one of the sentinel lists rather than real paths.
pub fn is_sentinel(result: &[String]) -> bool {
    match result.first() {
        Some(first) => first.starts_with("Error") || first.starts_with("No files"),
        None => true,
    }
}
