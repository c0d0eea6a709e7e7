//! Resolved configuration for a throwaway local server.
//!
//! The caller owns the server's lifecycle: picking a port, creating the
//! data and blob directories, generating keys, and tearing everything down.
//! This module only decides what such a server is configured with.

use std::path::Path;

use crate::config::{resolve, ConfigError, ServerConfig, LOCALHOST, LOCAL_HANDLE_DOMAIN};
use crate::RawEnvironment;

/// App view settings that point nowhere, for servers that never federate.
pub const DEV_APP_VIEW_URL: &str = "https://appview.invalid";
pub const DEV_APP_VIEW_DID: &str = "did:example:invalid";
pub const DEV_APP_VIEW_CDN_URL_PATTERN: &str = "http://cdn.appview.com/%s/%s/%s";

/// A resolved local server configuration and the raw record it came from.
///
/// ## Example
///
/// ```no_run
/// use pds_config::{DevEnvironment, RawEnvironment};
///
/// let dev = DevEnvironment::builder(2583, "/tmp/pds-data", "/tmp/pds-blobs")
///     .with_overrides(RawEnvironment {
///         invite_required: Some(true),
///         ..Default::default()
///     })
///     .build()?;
///
/// assert_eq!(dev.url(), "http://localhost:2583");
/// assert!(dev.config().invites.is_required());
/// # Ok::<(), pds_config::ConfigError>(())
/// ```
#[derive(Debug)]
pub struct DevEnvironment {
    raw: RawEnvironment,
    config: ServerConfig,
}

impl DevEnvironment {
    /// Starts a builder for a server on `port` storing data and blobs in the
    /// given directories.
    pub fn builder(
        port: u16,
        data_directory: impl AsRef<Path>,
        blobstore_location: impl AsRef<Path>,
    ) -> DevEnvironmentBuilder {
        DevEnvironmentBuilder {
            base: RawEnvironment {
                port: Some(port),
                data_directory: Some(path_string(data_directory.as_ref())),
                blobstore_disk_location: Some(path_string(blobstore_location.as_ref())),
                service_handle_domains: Some(vec![LOCAL_HANDLE_DOMAIN.to_owned()]),
                bsky_app_view_url: Some(DEV_APP_VIEW_URL.to_owned()),
                bsky_app_view_did: Some(DEV_APP_VIEW_DID.to_owned()),
                bsky_app_view_cdn_url_pattern: Some(DEV_APP_VIEW_CDN_URL_PATTERN.to_owned()),
                invite_required: Some(false),
                ..Default::default()
            },
            overrides: RawEnvironment::default(),
        }
    }

    /// Local URL clients use to reach the server.
    pub fn url(&self) -> String {
        format!("http://{LOCALHOST}:{}", self.port())
    }

    pub fn port(&self) -> u16 {
        self.config.service.port
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The merged record, for deriving the server's secrets alongside
    /// [`config`](Self::config).
    pub fn raw(&self) -> &RawEnvironment {
        &self.raw
    }
}

/// Builder for a [`DevEnvironment`].
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct DevEnvironmentBuilder {
    base: RawEnvironment,
    overrides: RawEnvironment,
}

impl DevEnvironmentBuilder {
    /// Recovery key the caller generated for the server's identity.
    pub fn with_recovery_did_key(mut self, key: impl Into<String>) -> Self {
        self.base.recovery_did_key = Some(key.into());
        self
    }

    /// Settings that win over the development defaults. Repeated calls
    /// layer on top of each other.
    pub fn with_overrides(mut self, overrides: RawEnvironment) -> Self {
        self.overrides = self.overrides.overlay(overrides);
        self
    }

    /// Merges the overrides over the defaults and resolves the result.
    pub fn build(self) -> Result<DevEnvironment, ConfigError> {
        let raw = self.base.overlay(self.overrides);
        let config = resolve(&raw)?;
        tracing::debug!(url = %config.service.public_url, "built development environment");
        Ok(DevEnvironment { raw, config })
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
