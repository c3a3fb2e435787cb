//! Output packaging: bundle a session's output tree into one artifact.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::errors::PackageError;

/// Bundles a session output directory into a single retrievable artifact.
pub trait Packager: Send + Sync {
    /// Package `output_dir` into `artifact_dir`, returning the artifact path.
    /// The artifact is named `{artifact_stem}.zip`.
    fn package(
        &self,
        output_dir: &Path,
        artifact_dir: &Path,
        artifact_stem: &str,
    ) -> Result<PathBuf, PackageError>;
}

/// Deflate-compressed zip packaging.
pub struct ZipPackager;

impl Packager for ZipPackager {
    fn package(
        &self,
        output_dir: &Path,
        artifact_dir: &Path,
        artifact_stem: &str,
    ) -> Result<PathBuf, PackageError> {
        if !output_dir.is_dir() {
            return Err(PackageError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("output folder not found: {}", output_dir.display()),
            )));
        }
        std::fs::create_dir_all(artifact_dir)?;

        let artifact_path = artifact_dir.join(format!("{artifact_stem}.zip"));
        let mut writer = ZipWriter::new(File::create(&artifact_path)?);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in WalkDir::new(output_dir).follow_links(false) {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry
                .path()
                .strip_prefix(output_dir)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .replace('\\', "/");
            writer.start_file(name, options)?;
            writer.write_all(&std::fs::read(entry.path())?)?;
        }

        writer.finish()?;
        tracing::info!("packaged {} -> {}", output_dir.display(), artifact_path.display());
        Ok(artifact_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_packages_nested_tree() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("session/docs");
        fs::create_dir_all(output.join("md")).unwrap();
        fs::create_dir_all(output.join("json")).unwrap();
        fs::write(output.join("md/a.md"), "# a").unwrap();
        fs::write(output.join("json/a.json"), "{}").unwrap();

        let artifacts = dir.path().join("zip");
        let path = ZipPackager
            .package(&output, &artifacts, "session_docs")
            .unwrap();

        assert_eq!(path, artifacts.join("session_docs.zip"));
        let archive =
            zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["json/a.json", "md/a.md"]);
    }

    #[test]
    fn test_missing_output_dir_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = ZipPackager.package(
            &dir.path().join("nope"),
            &dir.path().join("zip"),
            "x",
        );
        assert!(result.is_err());
    }
}
