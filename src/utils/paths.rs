use std::borrow::Cow;
use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use walkdir::WalkDir;

// Maximum size of a single export file: 256MB
const MAX_FILE_SIZE_BYTES: u64 = 256 * 1024 * 1024;

/// Validates that a file's size is within acceptable limits (256MB)
///
/// Takes an open file handle to avoid TOCTOU (time-of-check-time-of-use)
/// race conditions where the file could be modified between the size check
/// and subsequent file operations.
///
/// # Errors
///
/// Returns an error if:
/// - The file metadata cannot be read
/// - The file is larger than 256MB
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let file_size = metadata.len();
    if file_size > MAX_FILE_SIZE_BYTES {
        bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            file_size,
            MAX_FILE_SIZE_BYTES
        );
    }

    Ok(())
}

/// Expands a leading `~` to the home directory
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use ai_history_analyser::utils::expand_tilde;
///
/// assert_eq!(expand_tilde("/opt/vault"), PathBuf::from("/opt/vault"));
/// ```
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_internal(path, dirs::home_dir())
}

pub(crate) fn expand_tilde_internal(path: &str, home: Option<PathBuf>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(path);
    };
    if path == "~" {
        return home;
    }
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// Resolves an input argument to the export files it names
///
/// A file is returned as-is. A directory contributes every `*.json` file beneath it,
/// sorted by path so repeated runs see the same order.
///
/// # Errors
///
/// Returns an error if the path does not exist or a directory cannot be walked.
pub fn collect_export_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        bail!("Input not found: {}", path.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).follow_links(false) {
        let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
        let is_json = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if entry.file_type().is_file() && is_json {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Formats a path with ~ substitution for the home directory
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

/// Internal helper for path formatting with optional home override (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && !home.is_empty()
        && path_str.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_expand_tilde() {
        let home = Some(PathBuf::from("/home/alice"));
        assert_eq!(expand_tilde_internal("~", home.clone()), PathBuf::from("/home/alice"));
        assert_eq!(
            expand_tilde_internal("~/Vault/Notes", home.clone()),
            PathBuf::from("/home/alice/Vault/Notes")
        );
        assert_eq!(expand_tilde_internal("/abs/path", home.clone()), PathBuf::from("/abs/path"));
        assert_eq!(expand_tilde_internal("~bob/x", home), PathBuf::from("~bob/x"));
        assert_eq!(expand_tilde_internal("~/x", None), PathBuf::from("~/x"));
    }

    #[test]
    fn test_format_path_with_tilde() {
        let path = PathBuf::from("/Users/testuser/Documents/vault");
        let formatted = format_path_with_tilde_internal(&path, Some("/Users/testuser"));
        assert_eq!(formatted, "~/Documents/vault");

        let other = PathBuf::from("/opt/local/bin");
        assert_eq!(format_path_with_tilde_internal(&other, Some("/Users/testuser")), "/opt/local/bin");
    }

    #[test]
    fn test_collect_export_files_from_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.json"), "[]").unwrap();
        fs::write(dir.path().join("a.JSON"), "[]").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("nested").join("c.json"), "[]").unwrap();

        let files = collect_export_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.JSON", "b.json", "nested/c.json"]);
    }

    #[test]
    fn test_collect_export_files_single_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("export.json");
        fs::write(&file, "[]").unwrap();
        assert_eq!(collect_export_files(&file).unwrap(), vec![file]);
    }

    #[test]
    fn test_collect_export_files_missing() {
        let err = collect_export_files(Path::new("/nonexistent/exports")).unwrap_err();
        assert!(err.to_string().contains("Input not found"));
    }

    #[test]
    fn test_validate_file_size_small_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("small.json");
        fs::write(&path, "[]").unwrap();
        let file = File::open(&path).unwrap();
        assert!(validate_file_size(&file, &path).is_ok());
    }
}
