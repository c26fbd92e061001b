//! File selection for uploads.
//!
//! A [`FileSelection`] mirrors a file input: zero or more chosen paths, of which the upload
//! handler sends the first. The CLI builds one selection per file after expanding directories
//! with [`expand_paths`].

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions the document server accepts.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "cpp", "py", "java", "js", "ts", "html", "css", "txt", "md", "pdf", "zip",
];

/// Files chosen for upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    paths: Vec<PathBuf>,
}

impl FileSelection {
    /// Selection with nothing chosen.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Selection holding a single file.
    pub fn single(path: impl Into<PathBuf>) -> Self {
        Self {
            paths: vec![path.into()],
        }
    }

    /// Whether no file has been chosen.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// First chosen file, the one that gets uploaded.
    pub fn first(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }
}

impl From<Vec<PathBuf>> for FileSelection {
    fn from(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

/// Whether the server accepts files with this path's extension (case-insensitive).
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Expand directories into the supported files beneath them.
///
/// Explicit file arguments are kept as given, even with unsupported extensions, so that the
/// server reports the rejection. Directory contents are sorted for a stable upload order.
pub fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut expanded = Vec::new();
    for path in paths {
        if !path.is_dir() {
            expanded.push(path.clone());
            continue;
        }

        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(error) => {
                    tracing::warn!(%error, "Skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && is_supported(entry.path()))
            .map(walkdir::DirEntry::into_path)
            .collect();
        found.sort();
        tracing::debug!(
            directory = %path.display(),
            files = found.len(),
            "Expanded directory"
        );
        expanded.extend(found);
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_reports_first_file() {
        assert!(FileSelection::empty().is_empty());
        assert!(FileSelection::empty().first().is_none());

        let selection = FileSelection::from(vec![PathBuf::from("a.md"), PathBuf::from("b.md")]);
        assert!(!selection.is_empty());
        assert_eq!(selection.first(), Some(Path::new("a.md")));
    }

    #[test]
    fn supported_extensions_are_case_insensitive() {
        assert!(is_supported(Path::new("src/main.PY")));
        assert!(is_supported(Path::new("archive.zip")));
        assert!(!is_supported(Path::new("image.png")));
        assert!(!is_supported(Path::new("Makefile")));
    }

    #[test]
    fn directories_expand_to_supported_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).expect("nested dir");
        std::fs::write(dir.path().join("b.txt"), "b").expect("write");
        std::fs::write(dir.path().join("a.md"), "a").expect("write");
        std::fs::write(dir.path().join("skip.png"), "png").expect("write");
        std::fs::write(nested.join("c.py"), "c").expect("write");

        let explicit = PathBuf::from("explicit.bin");
        let expanded = expand_paths(&[dir.path().to_path_buf(), explicit.clone()]);

        assert_eq!(
            expanded,
            vec![
                dir.path().join("a.md"),
                dir.path().join("b.txt"),
                nested.join("c.py"),
                explicit,
            ]
        );
    }
}
