//! File collection for a documentation session.
//!
//! Walks a root directory and returns every readable text file keyed by its
//! relative path. Ignored directories are pruned before descent, so nested
//! ignored trees (a `node_modules` inside a `venv`) are never visited.

mod language;

pub use language::Language;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use walkdir::WalkDir;

use crate::errors::CollectError;

/// One collected file. Immutable; scoped to a single collection pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the collection root, `/`-separated.
    pub relative_path: String,
    pub content: String,
    pub size: u64,
    pub mtime: DateTime<Utc>,
    pub language: Language,
}

/// Collect every readable UTF-8 file under `root_dir`.
///
/// Directories whose name appears in `ignore_folders` are pruned before
/// descent; files whose name appears in `ignore_files` are skipped. A file
/// that cannot be read (permissions, non-UTF-8 content) is omitted from the
/// result rather than aborting the pass; partial results are expected.
///
/// The returned map carries no ordering guarantee; callers needing a
/// reproducible order must impose their own.
pub fn collect(
    root_dir: &Path,
    ignore_folders: &HashSet<String>,
    ignore_files: &HashSet<String>,
) -> Result<HashMap<String, FileRecord>, CollectError> {
    if !root_dir.exists() {
        return Err(CollectError::RootNotFound(root_dir.to_path_buf()));
    }
    if !root_dir.is_dir() {
        return Err(CollectError::NotADirectory(root_dir.to_path_buf()));
    }

    let mut files = HashMap::new();

    let walker = WalkDir::new(root_dir).follow_links(false).into_iter();
    for entry in walker.filter_entry(|e| {
        // Prune ignored directories at the point of descent. Depth 0 is the
        // root itself and is always kept, even if its name is ignored.
        e.depth() == 0
            || !e.file_type().is_dir()
            || !ignore_folders.contains(e.file_name().to_string_lossy().as_ref())
    }) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!("skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if ignore_files.contains(name.as_ref()) {
            continue;
        }

        let path = entry.path();
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!("skipping {}: {}", path.display(), e);
                continue;
            }
        };

        let relative_path = path
            .strip_prefix(root_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        let (size, mtime) = match entry.metadata() {
            Ok(meta) => {
                let mtime = meta
                    .modified()
                    .map(DateTime::<Utc>::from)
                    .unwrap_or_else(|_| Utc::now());
                (meta.len(), mtime)
            }
            Err(_) => (content.len() as u64, Utc::now()),
        };

        files.insert(
            relative_path.clone(),
            FileRecord {
                relative_path,
                content,
                size,
                mtime,
                language: Language::from_path(path),
            },
        );
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn ignore_set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn create_test_tree() -> TempDir {
        let dir = TempDir::new().unwrap();

        fs::create_dir(dir.path().join("pkg")).unwrap();
        fs::create_dir_all(dir.path().join("venv/lib")).unwrap();

        fs::write(dir.path().join("main.py"), "print('hi')\n").unwrap();
        fs::write(dir.path().join("pkg/util.py"), "X = 1\n").unwrap();
        fs::write(dir.path().join("venv/lib/site.py"), "ignored\n").unwrap();
        fs::write(dir.path().join(".gitignore"), "venv\n").unwrap();

        let mut binary = File::create(dir.path().join("blob.bin")).unwrap();
        binary.write_all(&[0x00, 0xff, 0xfe, 0x80, 0x81]).unwrap();

        dir
    }

    #[test]
    fn test_collects_relative_paths() {
        let dir = create_test_tree();
        let files = collect(dir.path(), &ignore_set(&["venv"]), &ignore_set(&[".gitignore"]))
            .unwrap();

        assert!(files.contains_key("main.py"));
        assert!(files.contains_key("pkg/util.py"));
        assert_eq!(files["pkg/util.py"].content, "X = 1\n");
        assert_eq!(files["main.py"].language, Language::Python);
    }

    #[test]
    fn test_ignored_folder_pruned() {
        let dir = create_test_tree();
        let files = collect(dir.path(), &ignore_set(&["venv"]), &HashSet::new()).unwrap();

        assert!(!files.keys().any(|k| k.starts_with("venv")));
    }

    #[test]
    fn test_ignored_files_skipped() {
        let dir = create_test_tree();
        let files = collect(dir.path(), &HashSet::new(), &ignore_set(&[".gitignore"])).unwrap();

        assert!(!files.contains_key(".gitignore"));
    }

    #[test]
    fn test_binary_file_omitted() {
        let dir = create_test_tree();
        let files = collect(dir.path(), &HashSet::new(), &HashSet::new()).unwrap();

        assert!(!files.contains_key("blob.bin"));
        assert!(files.contains_key("main.py"));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(collect(&missing, &HashSet::new(), &HashSet::new()).is_err());
    }

    #[test]
    fn test_same_name_different_directories_do_not_collide() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("a/x.py"), "A = 1\n").unwrap();
        fs::write(dir.path().join("b/x.py"), "B = 2\n").unwrap();

        let files = collect(dir.path(), &HashSet::new(), &HashSet::new()).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files["a/x.py"].content, "A = 1\n");
        assert_eq!(files["b/x.py"].content, "B = 2\n");
    }
}
