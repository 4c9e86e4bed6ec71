//! Temporary record files for testing file-backed relations.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A temporary file that is deleted when dropped.
pub struct TempFilePath {
    #[allow(dead_code)]
    temp_file: NamedTempFile,
    path: PathBuf,
}

impl TempFilePath {
    /// Create an empty temporary file whose name ends in `suffix` (e.g. `.csv.gz`).
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created.
    pub fn with_suffix(suffix: &str) -> Result<Self> {
        let temp_file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .context("create temporary file")?;
        let path = temp_file.path().to_path_buf();
        Ok(Self { temp_file, path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write `contents` to a temporary `.csv` file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
///
/// # Example
///
/// ```
/// use relcsv::testing::mock_csv_file;
///
/// let f = mock_csv_file("1,Smith,20,London\n").unwrap();
/// assert!(f.path().to_string_lossy().ends_with(".csv"));
/// ```
pub fn mock_csv_file(contents: &str) -> Result<TempFilePath> {
    let temp = TempFilePath::with_suffix(".csv")?;
    std::fs::write(temp.path(), contents)
        .with_context(|| format!("write {}", temp.path().display()))?;
    Ok(temp)
}

/// Write `contents` gzip-compressed to a temporary `.csv.gz` file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
#[cfg(feature = "compression-gzip")]
pub fn mock_gzip_csv_file(contents: &str) -> Result<TempFilePath> {
    use flate2::Compression;
    use flate2::write::GzEncoder;

    let temp = TempFilePath::with_suffix(".csv.gz")?;
    let f = std::fs::File::create(temp.path())
        .with_context(|| format!("create {}", temp.path().display()))?;
    let mut enc = GzEncoder::new(f, Compression::default());
    enc.write_all(contents.as_bytes())?;
    enc.finish()?.flush()?;
    Ok(temp)
}

/// Write `contents` zstd-compressed to a temporary file named `*.bin`, so that
/// only magic-byte detection can identify it.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
#[cfg(feature = "compression-zstd")]
pub fn mock_zstd_file_without_extension(contents: &str) -> Result<TempFilePath> {
    let temp = TempFilePath::with_suffix(".bin")?;
    let bytes = zstd::encode_all(contents.as_bytes(), 3).context("zstd encode")?;
    std::fs::write(temp.path(), bytes)
        .with_context(|| format!("write {}", temp.path().display()))?;
    Ok(temp)
}

/// Write a JSON relation config to a temporary `.json` file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn mock_config_file(json: &str) -> Result<TempFilePath> {
    let temp = TempFilePath::with_suffix(".json")?;
    std::fs::write(temp.path(), json)
        .with_context(|| format!("write {}", temp.path().display()))?;
    Ok(temp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_csv_file_contents() -> Result<()> {
        let f = mock_csv_file("a,b\n")?;
        assert_eq!(std::fs::read_to_string(f.path())?, "a,b\n");
        Ok(())
    }

    #[test]
    fn test_temp_file_removed_on_drop() -> Result<()> {
        let path = {
            let f = mock_csv_file("x")?;
            f.path().to_path_buf()
        };
        assert!(!path.exists());
        Ok(())
    }
}
