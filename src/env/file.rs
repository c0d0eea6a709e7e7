//! File-based environment source.

use std::path::{Path, PathBuf};

use super::source::{ConfigSource, SourceEntry};
use super::SourceError;

/// An environment source backed by a TOML file of flat `snake_case` keys.
///
/// ```toml
/// hostname = "pds.example.com"
/// blobstore_disk_location = "/pds/blocks"
/// service_handle_domains = [".pds.example.com"]
/// ```
///
/// Required files that don't exist cause an error; optional files that don't
/// exist are silently skipped.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    required: bool,
}

impl FileSource {
    /// Creates a new file source.
    ///
    /// If `required` is true, loading fails when the file doesn't exist.
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }
}

impl ConfigSource for FileSource {
    fn entries(&self) -> Result<Vec<SourceEntry>, SourceError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !self.required => {
                tracing::debug!(path = %self.path.display(), "optional environment file not found");
                return Ok(vec![]);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::FileNotFound(self.path.clone()));
            }
            Err(source) => {
                return Err(SourceError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let table: toml::Table = toml::from_str(&contents).map_err(|source| SourceError::Parse {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), keys = table.len(), "loaded environment file");

        Ok(SourceEntry::from_table(table))
    }
}
