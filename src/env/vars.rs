use std::ffi::OsString;

use toml::Value;

use super::source::{ConfigSource, SourceEntry};
use super::SourceError;

/// Reads prefixed process environment variables, e.g. `PDS_HOSTNAME`.
///
/// The prefix and the `_` that follows it are stripped and the remainder is
/// lower-cased, so `PDS_BLOBSTORE_DISK_LOCATION` becomes
/// `blobstore_disk_location`. Values stay text; typing happens when the
/// merged table is deserialized into a [`RawEnvironment`](super::RawEnvironment).
///
/// Variables outside the prefix are ignored whatever their encoding; a
/// prefixed variable that is not valid unicode is an error.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
}

impl EnvSource {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn collect(
        &self,
        vars: impl IntoIterator<Item = (OsString, OsString)>,
    ) -> Result<Vec<SourceEntry>, SourceError> {
        let prefix_with_sep = format!("{}_", self.prefix);
        let mut entries = Vec::new();

        for (key, value) in vars {
            let lossy_key = key.to_string_lossy();
            if !lossy_key.starts_with(&prefix_with_sep) {
                continue;
            }

            let (Some(key), Some(value)) = (key.to_str(), value.to_str()) else {
                return Err(SourceError::NonUnicode(lossy_key.into_owned()));
            };
            let Some(name) = key.strip_prefix(&prefix_with_sep) else {
                continue;
            };
            // An empty variable means "unset".
            if name.is_empty() || value.is_empty() {
                continue;
            }
            entries.push(SourceEntry::new(
                name.to_lowercase(),
                Value::String(value.to_owned()),
            ));
        }

        Ok(entries)
    }
}

impl ConfigSource for EnvSource {
    fn entries(&self) -> Result<Vec<SourceEntry>, SourceError> {
        let entries = self.collect(std::env::vars_os())?;
        tracing::debug!(
            prefix = %self.prefix,
            keys = entries.len(),
            "collected environment variables"
        );
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(OsString, OsString)> {
        pairs
            .iter()
            .map(|(k, v)| (OsString::from(k), OsString::from(v)))
            .collect()
    }

    #[test]
    fn test_prefix_stripped_and_lowercased() {
        let source = EnvSource::new("PDS");
        let entries = source
            .collect(vars(&[
                ("PDS_BLOBSTORE_DISK_LOCATION", "/pds/blocks"),
                ("PDS_PORT", "3000"),
            ]))
            .unwrap();

        assert_eq!(
            entries,
            vec![
                SourceEntry::new(
                    "blobstore_disk_location",
                    Value::String("/pds/blocks".into())
                ),
                SourceEntry::new("port", Value::String("3000".into())),
            ]
        );
    }

    #[test]
    fn test_foreign_and_empty_variables_skipped() {
        let source = EnvSource::new("PDS");
        let entries = source
            .collect(vars(&[
                ("HOME", "/root"),
                ("PDSX_HOSTNAME", "nope"),
                ("PDS_", "bare"),
                ("PDS_EMAIL_SMTP_URL", ""),
                ("PDS_HOSTNAME", "pds.example.com"),
            ]))
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "hostname");
    }

    #[cfg(unix)]
    mod non_unicode {
        use super::*;
        use std::os::unix::ffi::OsStringExt;

        fn invalid(prefix: &[u8]) -> OsString {
            let mut bytes = prefix.to_vec();
            bytes.push(0xff);
            OsString::from_vec(bytes)
        }

        #[test]
        fn test_foreign_non_unicode_variable_skipped() {
            let source = EnvSource::new("PDS");
            let mut pairs = vars(&[("PDS_HOSTNAME", "pds.example.com")]);
            pairs.insert(0, (invalid(b"UNRELATED_"), OsString::from("x")));
            pairs.push((OsString::from("OTHER"), invalid(b"value")));

            let entries = source.collect(pairs).unwrap();

            assert_eq!(
                entries,
                vec![SourceEntry::new(
                    "hostname",
                    Value::String("pds.example.com".into())
                )]
            );
        }

        #[test]
        fn test_prefixed_non_unicode_value_is_an_error() {
            let source = EnvSource::new("PDS");
            let pairs = vec![(OsString::from("PDS_HOSTNAME"), invalid(b"pds"))];

            let result = source.collect(pairs);

            assert!(matches!(
                result,
                Err(SourceError::NonUnicode(ref key)) if key == "PDS_HOSTNAME"
            ));
        }

        #[test]
        fn test_prefixed_non_unicode_key_is_an_error() {
            let source = EnvSource::new("PDS");
            let pairs = vec![(invalid(b"PDS_HOST"), OsString::from("x"))];

            assert!(matches!(
                source.collect(pairs),
                Err(SourceError::NonUnicode(_))
            ));
        }
    }
}
