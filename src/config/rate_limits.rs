use std::fmt;

use super::non_empty;
use crate::RawEnvironment;

/// Scratch redis used for shared rate-limit state.
#[derive(Clone, PartialEq, Eq)]
pub struct RedisScratchConfig {
    pub address: String,
    pub password: Option<String>,
}

impl fmt::Debug for RedisScratchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisScratchConfig")
            .field("address", &self.address)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Where rate-limit counters are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitMode {
    Memory,
    Redis,
}

impl RateLimitMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Redis => "redis",
        }
    }
}

impl fmt::Display for RateLimitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum RateLimitsConfig {
    Enabled {
        mode: RateLimitMode,
        bypass_key: Option<String>,
        /// Bare IPs, CIDR suffixes stripped.
        bypass_ips: Option<Vec<String>>,
    },
    Disabled,
}

impl RateLimitsConfig {
    pub const fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled { .. })
    }

    pub const fn mode(&self) -> Option<RateLimitMode> {
        match self {
            Self::Enabled { mode, .. } => Some(*mode),
            Self::Disabled => None,
        }
    }
}

impl fmt::Debug for RateLimitsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled {
                mode,
                bypass_key,
                bypass_ips,
            } => f
                .debug_struct("Enabled")
                .field("mode", mode)
                .field("bypass_key", &bypass_key.as_ref().map(|_| "<redacted>"))
                .field("bypass_ips", bypass_ips)
                .finish(),
            Self::Disabled => f.write_str("Disabled"),
        }
    }
}

pub(super) fn build_redis(raw: &RawEnvironment) -> Option<RedisScratchConfig> {
    non_empty(&raw.redis_scratch_address).map(|address| RedisScratchConfig {
        address: address.to_owned(),
        password: raw.redis_scratch_password.clone(),
    })
}

/// The mode follows whichever redis config was resolved before this runs.
pub(super) fn build(raw: &RawEnvironment, redis: Option<&RedisScratchConfig>) -> RateLimitsConfig {
    if !raw.rate_limits_enabled.unwrap_or(false) {
        return RateLimitsConfig::Disabled;
    }

    let mode = if redis.is_some() {
        RateLimitMode::Redis
    } else {
        RateLimitMode::Memory
    };

    RateLimitsConfig::Enabled {
        mode,
        bypass_key: raw.rate_limit_bypass_key.clone(),
        bypass_ips: raw
            .rate_limit_bypass_ips
            .as_ref()
            .map(|entries| entries.iter().map(|entry| bare_ip(entry)).collect()),
    }
}

/// `" 10.0.0.0/8"` -> `"10.0.0.0"`.
fn bare_ip(ip_or_cidr: &str) -> String {
    ip_or_cidr
        .split('/')
        .next()
        .unwrap_or_default()
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn redis() -> RedisScratchConfig {
        RedisScratchConfig {
            address: "redis:6379".into(),
            password: None,
        }
    }

    #[test]
    fn test_redis_present_iff_address() {
        assert_eq!(build_redis(&RawEnvironment::default()), None);

        let raw = RawEnvironment {
            redis_scratch_address: Some("redis:6379".into()),
            redis_scratch_password: Some("hunter2".into()),
            ..Default::default()
        };
        let cfg = build_redis(&raw).unwrap();
        assert_eq!(cfg.address, "redis:6379");
        assert_eq!(cfg.password.as_deref(), Some("hunter2"));
        assert!(!format!("{cfg:?}").contains("hunter2"));
    }

    #[test]
    fn test_password_alone_is_not_redis() {
        let raw = RawEnvironment {
            redis_scratch_password: Some("hunter2".into()),
            ..Default::default()
        };
        assert_eq!(build_redis(&raw), None);
    }

    #[rstest]
    #[case::unset(None, false)]
    #[case::off(Some(false), false)]
    #[case::off_with_redis(Some(false), true)]
    fn test_disabled(#[case] flag: Option<bool>, #[case] with_redis: bool) {
        let raw = RawEnvironment {
            rate_limits_enabled: flag,
            rate_limit_bypass_key: Some("bypass".into()),
            ..Default::default()
        };
        let redis = with_redis.then(redis);
        let limits = build(&raw, redis.as_ref());

        assert_eq!(limits, RateLimitsConfig::Disabled);
        assert!(!limits.is_enabled());
        assert_eq!(limits.mode(), None);
    }

    #[rstest]
    #[case::memory(false, RateLimitMode::Memory)]
    #[case::redis(true, RateLimitMode::Redis)]
    fn test_mode_follows_redis(#[case] with_redis: bool, #[case] expected: RateLimitMode) {
        let raw = RawEnvironment {
            rate_limits_enabled: Some(true),
            ..Default::default()
        };
        let redis = with_redis.then(redis);
        let limits = build(&raw, redis.as_ref());

        assert_eq!(limits.mode(), Some(expected));
        assert_eq!(
            limits,
            RateLimitsConfig::Enabled {
                mode: expected,
                bypass_key: None,
                bypass_ips: None,
            }
        );
    }

    #[test]
    fn test_bypass_ips_normalized_in_order() {
        let raw = RawEnvironment {
            rate_limits_enabled: Some(true),
            rate_limit_bypass_key: Some("bypass".into()),
            rate_limit_bypass_ips: Some(vec![
                " 10.0.0.0/8".into(),
                "192.168.1.7".into(),
                "10.0.0.0/16 ".into(),
                "2001:db8::/32".into(),
            ]),
            ..Default::default()
        };
        let RateLimitsConfig::Enabled {
            bypass_key,
            bypass_ips,
            ..
        } = build(&raw, None)
        else {
            panic!("expected rate limits to be enabled");
        };

        assert_eq!(bypass_key.as_deref(), Some("bypass"));
        assert_eq!(
            bypass_ips.unwrap(),
            vec!["10.0.0.0", "192.168.1.7", "10.0.0.0", "2001:db8::"]
        );
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(RateLimitMode::Redis.to_string(), "redis");
        assert_eq!(RateLimitMode::Memory.to_string(), "memory");
    }
}
