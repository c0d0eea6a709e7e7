use super::{non_empty, ConfigError, Section};

/// Outbound mail settings for one sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub smtp_url: String,
    pub from_address: String,
}

/// Names one email slot so both slots share a single validation rule.
#[derive(Debug, Clone, Copy)]
pub(super) struct EmailSlot {
    section: Section,
    smtp_url_field: &'static str,
    from_address_field: &'static str,
}

impl EmailSlot {
    pub(super) const PRIMARY: Self = Self {
        section: Section::Email,
        smtp_url_field: "email_smtp_url",
        from_address_field: "email_from_address",
    };

    pub(super) const MODERATION: Self = Self {
        section: Section::ModerationEmail,
        smtp_url_field: "moderation_email_smtp_url",
        from_address_field: "moderation_email_address",
    };

    /// Both settings give a config, neither gives `None`, one alone fails
    /// naming the other.
    pub(super) fn resolve(
        self,
        smtp_url: &Option<String>,
        from_address: &Option<String>,
    ) -> Result<Option<EmailConfig>, ConfigError> {
        let missing = match (non_empty(smtp_url), non_empty(from_address)) {
            (None, None) => return Ok(None),
            (Some(smtp_url), Some(from_address)) => {
                return Ok(Some(EmailConfig {
                    smtp_url: smtp_url.to_owned(),
                    from_address: from_address.to_owned(),
                }))
            }
            (Some(_), None) => self.from_address_field,
            (None, Some(_)) => self.smtp_url_field,
        };

        Err(ConfigError::MissingRequired {
            section: self.section,
            fields: vec![missing],
            reason: "partial email config, smtp url and from address must be set together",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn opt(value: Option<&str>) -> Option<String> {
        value.map(str::to_owned)
    }

    #[rstest]
    #[case::primary(EmailSlot::PRIMARY)]
    #[case::moderation(EmailSlot::MODERATION)]
    fn test_neither_is_absent(#[case] slot: EmailSlot) {
        assert_eq!(slot.resolve(&None, &None).unwrap(), None);
        assert_eq!(slot.resolve(&opt(Some("")), &None).unwrap(), None);
    }

    #[rstest]
    #[case::primary(EmailSlot::PRIMARY)]
    #[case::moderation(EmailSlot::MODERATION)]
    fn test_both_is_present(#[case] slot: EmailSlot) {
        let email = slot
            .resolve(&opt(Some("smtps://mail.example")), &opt(Some("noreply@example.com")))
            .unwrap();

        assert_eq!(
            email,
            Some(EmailConfig {
                smtp_url: "smtps://mail.example".into(),
                from_address: "noreply@example.com".into(),
            })
        );
    }

    #[rstest]
    #[case::primary_missing_from(
        EmailSlot::PRIMARY,
        Some("smtps://mail.example"),
        None,
        Section::Email,
        "email_from_address"
    )]
    #[case::primary_missing_smtp(
        EmailSlot::PRIMARY,
        None,
        Some("noreply@example.com"),
        Section::Email,
        "email_smtp_url"
    )]
    #[case::moderation_missing_from(
        EmailSlot::MODERATION,
        Some("smtps://mail.example"),
        None,
        Section::ModerationEmail,
        "moderation_email_address"
    )]
    #[case::moderation_missing_smtp(
        EmailSlot::MODERATION,
        None,
        Some("mod@example.com"),
        Section::ModerationEmail,
        "moderation_email_smtp_url"
    )]
    fn test_one_alone_names_counterpart(
        #[case] slot: EmailSlot,
        #[case] smtp_url: Option<&str>,
        #[case] from_address: Option<&str>,
        #[case] section: Section,
        #[case] missing: &'static str,
    ) {
        let err = slot.resolve(&opt(smtp_url), &opt(from_address)).unwrap_err();

        assert_eq!(
            err,
            ConfigError::MissingRequired {
                section,
                fields: vec![missing],
                reason: "partial email config, smtp url and from address must be set together",
            }
        );
    }
}
