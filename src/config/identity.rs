use std::time::Duration;

use super::service::LOCALHOST;
use super::{non_empty, ConfigError, Defaults, Section};
use crate::RawEnvironment;

/// Handle suffix used when serving from `localhost`.
pub const LOCAL_HANDLE_DOMAIN: &str = ".test";

/// DID resolution and handle settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    pub plc_url: String,
    pub cache_max_ttl: Duration,
    pub cache_stale_ttl: Duration,
    pub resolver_timeout: Duration,
    pub recovery_did_key: Option<String>,
    /// Never empty; every entry starts with `.`.
    pub service_handle_domains: Vec<String>,
    pub handle_backup_nameservers: Option<Vec<String>>,
    pub enable_did_doc_with_session: bool,
}

/// Delegated authority this instance defers to. All four settings are
/// supplied together.
#[derive(Clone, PartialEq, Eq)]
pub struct EntrywayConfig {
    pub url: String,
    pub did: String,
    pub jwt_public_key_hex: String,
    pub plc_rotation_key: String,
}

impl std::fmt::Debug for EntrywayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntrywayConfig")
            .field("url", &self.url)
            .field("did", &self.did)
            .field("jwt_public_key_hex", &self.jwt_public_key_hex)
            .field("plc_rotation_key", &"<redacted>")
            .finish()
    }
}

pub(super) fn build(
    raw: &RawEnvironment,
    hostname: &str,
    defaults: &Defaults,
) -> Result<IdentityConfig, ConfigError> {
    let service_handle_domains = handle_domains(raw, hostname)?;

    Ok(IdentityConfig {
        plc_url: raw
            .did_plc_url
            .clone()
            .unwrap_or_else(|| defaults.plc_url.clone()),
        cache_max_ttl: millis_or(raw.did_cache_max_ttl, defaults.did_cache_max_ttl),
        cache_stale_ttl: millis_or(raw.did_cache_stale_ttl, defaults.did_cache_stale_ttl),
        resolver_timeout: millis_or(raw.resolver_timeout, defaults.resolver_timeout),
        recovery_did_key: raw.recovery_did_key.clone(),
        service_handle_domains,
        handle_backup_nameservers: raw.handle_backup_nameservers.clone(),
        enable_did_doc_with_session: raw.enable_did_doc_with_session.unwrap_or(false),
    })
}

fn millis_or(millis: Option<u64>, default: Duration) -> Duration {
    millis.map_or(default, Duration::from_millis)
}

fn handle_domains(raw: &RawEnvironment, hostname: &str) -> Result<Vec<String>, ConfigError> {
    let domains = match &raw.service_handle_domains {
        Some(domains) if !domains.is_empty() => domains.clone(),
        _ if hostname == LOCALHOST => vec![LOCAL_HANDLE_DOMAIN.to_owned()],
        _ => vec![format!(".{hostname}")],
    };

    if let Some(invalid) = domains.iter().find(|domain| !domain.starts_with('.')) {
        return Err(ConfigError::InvalidValue {
            section: Section::Identity,
            field: "service_handle_domains",
            value: invalid.clone(),
            reason: "is not a handle domain: must be non-empty and start with '.'",
        });
    }

    Ok(domains)
}

pub(super) fn build_entryway(raw: &RawEnvironment) -> Result<Option<EntrywayConfig>, ConfigError> {
    let Some(url) = non_empty(&raw.entryway_url) else {
        return Ok(None);
    };

    match (
        non_empty(&raw.entryway_did),
        non_empty(&raw.entryway_jwt_verify_key_k256_public_key_hex),
        non_empty(&raw.entryway_plc_rotation_key),
    ) {
        (Some(did), Some(jwt_public_key_hex), Some(plc_rotation_key)) => Ok(Some(EntrywayConfig {
            url: url.to_owned(),
            did: did.to_owned(),
            jwt_public_key_hex: jwt_public_key_hex.to_owned(),
            plc_rotation_key: plc_rotation_key.to_owned(),
        })),
        _ => Err(ConfigError::MissingRequired {
            section: Section::Entryway,
            fields: vec![
                "entryway_did",
                "entryway_jwt_verify_key_k256_public_key_hex",
                "entryway_plc_rotation_key",
            ],
            reason: "entryway_url is set, so every entryway setting is required",
        }),
    }
}
