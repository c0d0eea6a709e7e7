//! Resolution of a [`RawEnvironment`] into a validated [`ServerConfig`].
//!
//! Each subsection has its own builder. [`resolve_with`] runs them in a fixed
//! order and stops at the first [`ConfigError`], so a bad environment never
//! produces a partially configured server.

mod appview;
mod blobstore;
mod email;
mod error;
mod identity;
mod invites;
mod rate_limits;
mod service;
mod storage;
mod subscription;

use std::time::Duration;

use crate::RawEnvironment;

pub use appview::BskyAppViewConfig;
pub use blobstore::{BlobstoreConfig, DiskBlobstoreConfig, S3BlobstoreConfig, S3Credentials};
pub use email::EmailConfig;
pub use error::{ConfigError, Section};
pub use identity::{EntrywayConfig, IdentityConfig, LOCAL_HANDLE_DOMAIN};
pub use invites::InvitesConfig;
pub use rate_limits::{RateLimitMode, RateLimitsConfig, RedisScratchConfig};
pub use service::{ServiceConfig, LOCALHOST};
pub use storage::{ActorStoreConfig, DatabaseConfig};
pub use subscription::SubscriptionConfig;

use email::EmailSlot;

const HOUR: Duration = Duration::from_secs(60 * 60);
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

pub const DEFAULT_PORT: u16 = 2583;
pub const DEFAULT_HOSTNAME: &str = LOCALHOST;
pub const DEFAULT_PLC_URL: &str = "https://plc.directory";
pub const DEFAULT_DID_CACHE_MAX_TTL: Duration = DAY;
pub const DEFAULT_DID_CACHE_STALE_TTL: Duration = HOUR;
pub const DEFAULT_RESOLVER_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_ACTOR_STORE_CACHE_SIZE: usize = 100;
pub const DEFAULT_MAX_SUBSCRIPTION_BUFFER: usize = 500;
pub const DEFAULT_REPO_BACKFILL_LIMIT: Duration = DAY;
pub const DEFAULT_INVITE_EPOCH: u64 = 0;

/// Values used for settings the environment leaves unset.
///
/// [`resolve`] uses [`Defaults::default`]; pass a tweaked copy to
/// [`resolve_with`] instead of editing the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    pub port: u16,
    pub hostname: String,
    pub plc_url: String,
    pub did_cache_max_ttl: Duration,
    pub did_cache_stale_ttl: Duration,
    pub resolver_timeout: Duration,
    pub actor_store_cache_size: usize,
    pub max_subscription_buffer: usize,
    pub repo_backfill_limit: Duration,
    pub invite_epoch: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            hostname: DEFAULT_HOSTNAME.to_owned(),
            plc_url: DEFAULT_PLC_URL.to_owned(),
            did_cache_max_ttl: DEFAULT_DID_CACHE_MAX_TTL,
            did_cache_stale_ttl: DEFAULT_DID_CACHE_STALE_TTL,
            resolver_timeout: DEFAULT_RESOLVER_TIMEOUT,
            actor_store_cache_size: DEFAULT_ACTOR_STORE_CACHE_SIZE,
            max_subscription_buffer: DEFAULT_MAX_SUBSCRIPTION_BUFFER,
            repo_backfill_limit: DEFAULT_REPO_BACKFILL_LIMIT,
            invite_epoch: DEFAULT_INVITE_EPOCH,
        }
    }
}

/// Fully resolved server configuration. Built once at startup and never
/// mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub actor_store: ActorStoreConfig,
    pub blobstore: BlobstoreConfig,
    pub identity: IdentityConfig,
    pub entryway: Option<EntrywayConfig>,
    pub invites: InvitesConfig,
    pub email: Option<EmailConfig>,
    pub moderation_email: Option<EmailConfig>,
    pub subscription: SubscriptionConfig,
    pub bsky_app_view: BskyAppViewConfig,
    pub redis: Option<RedisScratchConfig>,
    pub rate_limits: RateLimitsConfig,
    pub crawlers: Vec<String>,
}

/// Resolves `raw` with the built-in [`Defaults`].
pub fn resolve(raw: &RawEnvironment) -> Result<ServerConfig, ConfigError> {
    resolve_with(raw, &Defaults::default())
}

/// Resolves `raw`, filling unset settings from `defaults`.
///
/// Returns the first defect found; nothing is collected or recovered.
pub fn resolve_with(
    raw: &RawEnvironment,
    defaults: &Defaults,
) -> Result<ServerConfig, ConfigError> {
    assemble(raw, defaults).inspect_err(|err| {
        tracing::warn!(section = %err.section(), error = %err, "rejected server configuration");
    })
}

fn assemble(raw: &RawEnvironment, defaults: &Defaults) -> Result<ServerConfig, ConfigError> {
    let service = service::build(raw, defaults);
    let database = storage::build_database(raw);
    let actor_store = storage::build_actor_store(raw, defaults);

    let blobstore = blobstore::build(raw)?;
    tracing::debug!(provider = blobstore.provider(), "resolved blobstore");

    let identity = identity::build(raw, &service.hostname, defaults)?;
    tracing::debug!(handle_domains = ?identity.service_handle_domains, "resolved identity");

    let entryway = identity::build_entryway(raw)?;
    let invites = invites::build(raw, defaults);
    let email = EmailSlot::PRIMARY.resolve(&raw.email_smtp_url, &raw.email_from_address)?;
    let moderation_email = EmailSlot::MODERATION
        .resolve(&raw.moderation_email_smtp_url, &raw.moderation_email_address)?;
    let subscription = subscription::build(raw, defaults);
    let bsky_app_view = appview::build(raw)?;

    let redis = rate_limits::build_redis(raw);
    let rate_limits = rate_limits::build(raw, redis.as_ref());
    tracing::debug!(
        entryway = entryway.is_some(),
        invites_required = invites.is_required(),
        rate_limits = rate_limits.mode().map_or("disabled", RateLimitMode::as_str),
        "resolved policies"
    );

    let crawlers = subscription::build_crawlers(raw);

    tracing::info!(
        public_url = %service.public_url,
        did = %service.did,
        blobstore = blobstore.provider(),
        "resolved server configuration"
    );

    Ok(ServerConfig {
        service,
        database,
        actor_store,
        blobstore,
        identity,
        entryway,
        invites,
        email,
        moderation_email,
        subscription,
        bsky_app_view,
        redis,
        rate_limits,
        crawlers,
    })
}

/// Treats a blank value the same as an unset one.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> RawEnvironment {
        RawEnvironment {
            blobstore_disk_location: Some("/tmp/blobs".into()),
            bsky_app_view_url: Some("https://av.example".into()),
            bsky_app_view_did: Some("did:example:av".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_RESOLVER_TIMEOUT, Duration::from_secs(3));
        assert_eq!(DEFAULT_DID_CACHE_MAX_TTL, Duration::from_millis(86_400_000));
        assert_eq!(DEFAULT_DID_CACHE_STALE_TTL, Duration::from_millis(3_600_000));
    }

    #[test]
    fn test_injected_defaults_reach_builders() {
        let defaults = Defaults {
            port: 8080,
            invite_epoch: 7,
            max_subscription_buffer: 1,
            ..Defaults::default()
        };
        let cfg = resolve_with(&minimal(), &defaults).unwrap();

        assert_eq!(cfg.service.public_url, "http://localhost:8080");
        assert_eq!(
            cfg.invites,
            InvitesConfig::Required {
                interval: None,
                epoch: 7,
            }
        );
        assert_eq!(cfg.subscription.max_buffer, 1);
    }

    #[test]
    fn test_first_failure_wins() {
        // blobstore is checked before the app view
        let raw = RawEnvironment {
            blobstore_disk_location: None,
            bsky_app_view_url: None,
            ..minimal()
        };
        assert_eq!(resolve(&raw).unwrap_err().section(), Section::Blobstore);

        let raw = RawEnvironment {
            service_handle_domains: Some(vec!["nodot".into()]),
            email_smtp_url: Some("smtps://mail.example".into()),
            ..minimal()
        };
        assert_eq!(resolve(&raw).unwrap_err().section(), Section::Identity);

        let raw = RawEnvironment {
            email_smtp_url: Some("smtps://mail.example".into()),
            moderation_email_address: Some("mod@example.com".into()),
            ..minimal()
        };
        assert_eq!(resolve(&raw).unwrap_err().section(), Section::Email);
    }

    #[test]
    fn test_blank_values_are_unset() {
        assert_eq!(non_empty(&Some(String::new())), None);
        assert_eq!(non_empty(&Some("x".into())), Some("x"));
        assert_eq!(non_empty(&None), None);
    }
}
