use std::fmt;

use thiserror::Error;

/// The configuration subsection a [`ConfigError`] concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Section {
    Blobstore,
    Identity,
    Entryway,
    Email,
    ModerationEmail,
    BskyAppView,
}

impl Section {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blobstore => "blobstore",
            Self::Identity => "identity",
            Self::Entryway => "entryway",
            Self::Email => "email",
            Self::ModerationEmail => "moderation_email",
            Self::BskyAppView => "bsky_app_view",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configuration defect detected while resolving a
/// [`RawEnvironment`](crate::RawEnvironment).
///
/// Field names are the raw `snake_case` setting names; the operator-facing
/// variable is the upper-cased name with a `PDS_` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Two settings that exclude each other were both supplied.
    #[error("invalid {section} config: cannot set both {}", .fields.join(" and "))]
    MutualExclusion {
        section: Section,
        fields: Vec<&'static str>,
    },

    /// A mandatory setting, or a member of an all-or-nothing group, is absent.
    #[error("invalid {section} config: {reason} ({})", .fields.join(", "))]
    MissingRequired {
        section: Section,
        fields: Vec<&'static str>,
        reason: &'static str,
    },

    /// A supplied value failed a shape check.
    #[error("invalid {section} config: {field} value {value:?} {reason}")]
    InvalidValue {
        section: Section,
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl ConfigError {
    /// The subsection that failed.
    pub fn section(&self) -> Section {
        match self {
            Self::MutualExclusion { section, .. }
            | Self::MissingRequired { section, .. }
            | Self::InvalidValue { section, .. } => *section,
        }
    }
}
