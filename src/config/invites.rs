use std::time::Duration;

use super::Defaults;
use crate::RawEnvironment;

/// Whether account creation needs an invite code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvitesConfig {
    Required {
        /// How often accounts earn a new code; `None` means never.
        interval: Option<Duration>,
        epoch: u64,
    },
    NotRequired,
}

impl InvitesConfig {
    pub const fn is_required(&self) -> bool {
        matches!(self, Self::Required { .. })
    }
}

/// Required unless `invite_required` is explicitly `false`.
pub(super) fn build(raw: &RawEnvironment, defaults: &Defaults) -> InvitesConfig {
    if raw.invite_required == Some(false) {
        return InvitesConfig::NotRequired;
    }

    InvitesConfig::Required {
        interval: raw.invite_interval.map(Duration::from_millis),
        epoch: raw.invite_epoch.unwrap_or(defaults.invite_epoch),
    }
}
