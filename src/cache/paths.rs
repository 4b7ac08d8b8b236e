// Cache path utilities.
// Maps preference keys to files under the per-user cache directory.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/whatsnew on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "whatsnew").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path of the file backing a preference key.
pub fn key_path(root: &Path, key: &str) -> PathBuf {
    root.join(sanitize_name(key))
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect();

    // Keep keys from resolving to the directory itself or its parent.
    match cleaned.as_str() {
        "" | "." | ".." => format!("_{}", cleaned),
        _ => cleaned,
    }
}
