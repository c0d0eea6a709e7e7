//! The raw, unvalidated environment record and the sources it is loaded from.

mod coerce;
mod error;
mod file;
mod loader;
mod source;
mod vars;

use std::fmt;

use serde::Deserialize;

pub use error::SourceError;
pub use file::FileSource;
pub use loader::EnvLoader;
pub use source::{ConfigSource, SourceEntry};
pub use vars::EnvSource;

/// Prefix shared by every operator-facing variable, e.g. `PDS_HOSTNAME`.
pub const ENV_PREFIX: &str = "PDS";

/// Flat record of operator-supplied settings.
///
/// Every field is optional. Durations are in milliseconds. `Debug` output
/// hides secret values. Nothing here is validated; [`resolve`](crate::resolve) turns it into a
/// [`ServerConfig`](crate::ServerConfig).
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawEnvironment {
    // service
    #[serde(deserialize_with = "coerce::opt_number")]
    pub port: Option<u16>,
    pub hostname: Option<String>,
    pub service_did: Option<String>,
    pub version: Option<String>,
    pub privacy_policy_url: Option<String>,
    pub terms_of_service_url: Option<String>,

    // storage
    pub data_directory: Option<String>,
    #[serde(deserialize_with = "coerce::opt_flag")]
    pub disable_wal_auto_checkpoint: Option<bool>,
    pub account_db_location: Option<String>,
    pub sequencer_db_location: Option<String>,
    pub did_cache_db_location: Option<String>,
    pub actor_store_directory: Option<String>,
    #[serde(deserialize_with = "coerce::opt_number")]
    pub actor_store_cache_size: Option<usize>,

    // blobstore
    pub blobstore_s3_bucket: Option<String>,
    pub blobstore_s3_region: Option<String>,
    pub blobstore_s3_endpoint: Option<String>,
    #[serde(deserialize_with = "coerce::opt_flag")]
    pub blobstore_s3_force_path_style: Option<bool>,
    pub blobstore_s3_access_key_id: Option<String>,
    pub blobstore_s3_secret_access_key: Option<String>,
    pub blobstore_disk_location: Option<String>,
    pub blobstore_disk_tmp_location: Option<String>,

    // identity
    pub did_plc_url: Option<String>,
    #[serde(deserialize_with = "coerce::opt_number")]
    pub did_cache_max_ttl: Option<u64>,
    #[serde(deserialize_with = "coerce::opt_number")]
    pub did_cache_stale_ttl: Option<u64>,
    #[serde(deserialize_with = "coerce::opt_number")]
    pub resolver_timeout: Option<u64>,
    pub recovery_did_key: Option<String>,
    #[serde(deserialize_with = "coerce::opt_list")]
    pub service_handle_domains: Option<Vec<String>>,
    #[serde(deserialize_with = "coerce::opt_list")]
    pub handle_backup_nameservers: Option<Vec<String>>,
    #[serde(deserialize_with = "coerce::opt_flag")]
    pub enable_did_doc_with_session: Option<bool>,

    // entryway
    pub entryway_url: Option<String>,
    pub entryway_did: Option<String>,
    pub entryway_jwt_verify_key_k256_public_key_hex: Option<String>,
    pub entryway_plc_rotation_key: Option<String>,

    // invites
    #[serde(deserialize_with = "coerce::opt_flag")]
    pub invite_required: Option<bool>,
    #[serde(deserialize_with = "coerce::opt_number")]
    pub invite_interval: Option<u64>,
    #[serde(deserialize_with = "coerce::opt_number")]
    pub invite_epoch: Option<u64>,

    // email
    pub email_smtp_url: Option<String>,
    pub email_from_address: Option<String>,
    pub moderation_email_smtp_url: Option<String>,
    pub moderation_email_address: Option<String>,

    // subscription
    #[serde(deserialize_with = "coerce::opt_number")]
    pub max_subscription_buffer: Option<usize>,
    #[serde(deserialize_with = "coerce::opt_number")]
    pub repo_backfill_limit_ms: Option<u64>,

    // bsky app view
    pub bsky_app_view_url: Option<String>,
    pub bsky_app_view_did: Option<String>,
    #[serde(deserialize_with = "coerce::opt_flag")]
    pub bsky_app_view_moderation: Option<bool>,
    pub bsky_app_view_cdn_url_pattern: Option<String>,

    // redis
    pub redis_scratch_address: Option<String>,
    pub redis_scratch_password: Option<String>,

    // rate limits
    #[serde(deserialize_with = "coerce::opt_flag")]
    pub rate_limits_enabled: Option<bool>,
    pub rate_limit_bypass_key: Option<String>,
    #[serde(deserialize_with = "coerce::opt_list")]
    pub rate_limit_bypass_ips: Option<Vec<String>>,

    // crawlers
    #[serde(deserialize_with = "coerce::opt_list")]
    pub crawlers: Option<Vec<String>>,
}

macro_rules! overlay_fields {
    ($base:ident, $top:ident; $($field:ident),* $(,)?) => {
        RawEnvironment {
            $($field: $top.$field.or($base.$field),)*
        }
    };
}

impl RawEnvironment {
    /// Starts a loader with no sources registered.
    pub fn loader() -> EnvLoader {
        EnvLoader::new()
    }

    /// Loads `PDS_*` variables from the process environment.
    pub fn from_env() -> Result<Self, SourceError> {
        Self::loader().with_env(ENV_PREFIX).load()
    }

    /// Layers `top` over `self`: every setting present in `top` wins.
    pub fn overlay(self, top: RawEnvironment) -> RawEnvironment {
        let base = self;
        overlay_fields!(base, top;
            port,
            hostname,
            service_did,
            version,
            privacy_policy_url,
            terms_of_service_url,
            data_directory,
            disable_wal_auto_checkpoint,
            account_db_location,
            sequencer_db_location,
            did_cache_db_location,
            actor_store_directory,
            actor_store_cache_size,
            blobstore_s3_bucket,
            blobstore_s3_region,
            blobstore_s3_endpoint,
            blobstore_s3_force_path_style,
            blobstore_s3_access_key_id,
            blobstore_s3_secret_access_key,
            blobstore_disk_location,
            blobstore_disk_tmp_location,
            did_plc_url,
            did_cache_max_ttl,
            did_cache_stale_ttl,
            resolver_timeout,
            recovery_did_key,
            service_handle_domains,
            handle_backup_nameservers,
            enable_did_doc_with_session,
            entryway_url,
            entryway_did,
            entryway_jwt_verify_key_k256_public_key_hex,
            entryway_plc_rotation_key,
            invite_required,
            invite_interval,
            invite_epoch,
            email_smtp_url,
            email_from_address,
            moderation_email_smtp_url,
            moderation_email_address,
            max_subscription_buffer,
            repo_backfill_limit_ms,
            bsky_app_view_url,
            bsky_app_view_did,
            bsky_app_view_moderation,
            bsky_app_view_cdn_url_pattern,
            redis_scratch_address,
            redis_scratch_password,
            rate_limits_enabled,
            rate_limit_bypass_key,
            rate_limit_bypass_ips,
            crawlers,
        )
    }
}

impl fmt::Debug for RawEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawEnvironment")
            .field("port", &self.port)
            .field("hostname", &self.hostname)
            .field("service_did", &self.service_did)
            .field("version", &self.version)
            .field("privacy_policy_url", &self.privacy_policy_url)
            .field("terms_of_service_url", &self.terms_of_service_url)
            .field("data_directory", &self.data_directory)
            .field("disable_wal_auto_checkpoint", &self.disable_wal_auto_checkpoint)
            .field("account_db_location", &self.account_db_location)
            .field("sequencer_db_location", &self.sequencer_db_location)
            .field("did_cache_db_location", &self.did_cache_db_location)
            .field("actor_store_directory", &self.actor_store_directory)
            .field("actor_store_cache_size", &self.actor_store_cache_size)
            .field("blobstore_s3_bucket", &self.blobstore_s3_bucket)
            .field("blobstore_s3_region", &self.blobstore_s3_region)
            .field("blobstore_s3_endpoint", &self.blobstore_s3_endpoint)
            .field("blobstore_s3_force_path_style", &self.blobstore_s3_force_path_style)
            .field("blobstore_s3_access_key_id", &self.blobstore_s3_access_key_id)
            .field(
                "blobstore_s3_secret_access_key",
                &redacted(&self.blobstore_s3_secret_access_key),
            )
            .field("blobstore_disk_location", &self.blobstore_disk_location)
            .field("blobstore_disk_tmp_location", &self.blobstore_disk_tmp_location)
            .field("did_plc_url", &self.did_plc_url)
            .field("did_cache_max_ttl", &self.did_cache_max_ttl)
            .field("did_cache_stale_ttl", &self.did_cache_stale_ttl)
            .field("resolver_timeout", &self.resolver_timeout)
            .field("recovery_did_key", &self.recovery_did_key)
            .field("service_handle_domains", &self.service_handle_domains)
            .field("handle_backup_nameservers", &self.handle_backup_nameservers)
            .field("enable_did_doc_with_session", &self.enable_did_doc_with_session)
            .field("entryway_url", &self.entryway_url)
            .field("entryway_did", &self.entryway_did)
            .field(
                "entryway_jwt_verify_key_k256_public_key_hex",
                &self.entryway_jwt_verify_key_k256_public_key_hex,
            )
            .field("entryway_plc_rotation_key", &redacted(&self.entryway_plc_rotation_key))
            .field("invite_required", &self.invite_required)
            .field("invite_interval", &self.invite_interval)
            .field("invite_epoch", &self.invite_epoch)
            .field("email_smtp_url", &self.email_smtp_url)
            .field("email_from_address", &self.email_from_address)
            .field("moderation_email_smtp_url", &self.moderation_email_smtp_url)
            .field("moderation_email_address", &self.moderation_email_address)
            .field("max_subscription_buffer", &self.max_subscription_buffer)
            .field("repo_backfill_limit_ms", &self.repo_backfill_limit_ms)
            .field("bsky_app_view_url", &self.bsky_app_view_url)
            .field("bsky_app_view_did", &self.bsky_app_view_did)
            .field("bsky_app_view_moderation", &self.bsky_app_view_moderation)
            .field("bsky_app_view_cdn_url_pattern", &self.bsky_app_view_cdn_url_pattern)
            .field("redis_scratch_address", &self.redis_scratch_address)
            .field("redis_scratch_password", &redacted(&self.redis_scratch_password))
            .field("rate_limits_enabled", &self.rate_limits_enabled)
            .field("rate_limit_bypass_key", &redacted(&self.rate_limit_bypass_key))
            .field("rate_limit_bypass_ips", &self.rate_limit_bypass_ips)
            .field("crawlers", &self.crawlers)
            .finish()
    }
}

fn redacted(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "<redacted>")
}
