use crate::config::ConfigError;
use crate::env::SourceError;
use thiserror::Error;

/// Top-level error type for the pds-config library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("environment error: {0}")]
    Source(#[from] SourceError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Section;

    #[test]
    fn test_config_error_message_preserved() {
        let inner = ConfigError::MissingRequired {
            section: Section::BskyAppView,
            fields: vec!["bsky_app_view_url"],
            reason: "an app view must be configured",
        };
        let err = Error::from(inner.clone());

        assert_eq!(err.to_string(), format!("configuration error: {inner}"));
    }

    #[test]
    fn test_source_error_converts() {
        let err: Error = SourceError::FileNotFound("/etc/pds.toml".into()).into();
        assert!(err.to_string().starts_with("environment error: "));
        assert!(err.to_string().contains("/etc/pds.toml"));
    }
}
