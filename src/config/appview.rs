use super::{non_empty, ConfigError, Section};
use crate::RawEnvironment;

/// The Bluesky app view this service federates with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BskyAppViewConfig {
    pub url: String,
    pub did: String,
    pub proxy_moderation: bool,
    pub cdn_url_pattern: Option<String>,
}

pub(super) fn build(raw: &RawEnvironment) -> Result<BskyAppViewConfig, ConfigError> {
    let url = non_empty(&raw.bsky_app_view_url).ok_or_else(|| missing("bsky_app_view_url"))?;
    let did = non_empty(&raw.bsky_app_view_did).ok_or_else(|| missing("bsky_app_view_did"))?;

    Ok(BskyAppViewConfig {
        url: url.to_owned(),
        did: did.to_owned(),
        proxy_moderation: raw.bsky_app_view_moderation.unwrap_or(false),
        cdn_url_pattern: raw.bsky_app_view_cdn_url_pattern.clone(),
    })
}

fn missing(field: &'static str) -> ConfigError {
    ConfigError::MissingRequired {
        section: Section::BskyAppView,
        fields: vec![field],
        reason: "an app view must be configured",
    }
}
