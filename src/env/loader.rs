use std::path::Path;

use super::file::FileSource;
use super::source::{merge_entries, ConfigSource};
use super::vars::EnvSource;
use super::{RawEnvironment, SourceError};

/// Builder that collects a [`RawEnvironment`] from layered sources.
///
/// Sources are merged in registration order, with later sources overriding
/// earlier ones key by key.
///
/// ## Example
///
/// ```no_run
/// use pds_config::RawEnvironment;
///
/// // defaults file -> process environment -> local file overrides env
/// let raw = RawEnvironment::loader()
///     .with_file("pds.toml", true)
///     .with_env("PDS")
///     .with_file("pds.local.toml", false)
///     .load()?;
/// # Ok::<(), pds_config::SourceError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "loaders do nothing until .load() is called"]
pub struct EnvLoader {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl EnvLoader {
    /// Creates a loader with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a TOML file of flat `snake_case` keys.
    ///
    /// If `required` is `true`, loading fails if the file doesn't exist.
    /// Optional files that are missing are silently skipped.
    pub fn with_file(self, path: impl AsRef<Path>, required: bool) -> Self {
        self.with_source(FileSource::new(path, required))
    }

    /// Adds process environment variables named `<prefix>_<SETTING>`.
    ///
    /// With prefix `PDS`, `PDS_SERVICE_HANDLE_DOMAINS=.a.example,.b.example`
    /// sets `service_handle_domains`.
    pub fn with_env(self, prefix: impl Into<String>) -> Self {
        self.with_source(EnvSource::new(prefix))
    }

    /// Adds any other source.
    pub fn with_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Collects every source, merges them, and types the result.
    pub fn load(self) -> Result<RawEnvironment, SourceError> {
        let mut merged = toml::Table::new();

        for source in &self.sources {
            merge_entries(&mut merged, source.entries()?);
        }

        tracing::debug!(
            sources = self.sources.len(),
            keys = merged.len(),
            "merged raw environment"
        );

        let value = toml::Value::Table(merged);
        value.try_into().map_err(SourceError::Deserialize)
    }
}
