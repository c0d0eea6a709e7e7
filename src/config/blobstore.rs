use std::path::PathBuf;

use super::{non_empty, ConfigError, Section};
use crate::RawEnvironment;

/// Where blobs live. Exactly one provider is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobstoreConfig {
    S3(S3BlobstoreConfig),
    Disk(DiskBlobstoreConfig),
}

impl BlobstoreConfig {
    /// `"s3"` or `"disk"`.
    pub const fn provider(&self) -> &'static str {
        match self {
            Self::S3(_) => "s3",
            Self::Disk(_) => "disk",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3BlobstoreConfig {
    pub bucket: String,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub force_path_style: Option<bool>,
    pub credentials: Option<S3Credentials>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct S3Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for S3Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskBlobstoreConfig {
    pub location: PathBuf,
    pub temp_location: Option<PathBuf>,
}

pub(super) fn build(raw: &RawEnvironment) -> Result<BlobstoreConfig, ConfigError> {
    let bucket = non_empty(&raw.blobstore_s3_bucket);
    let disk_location = non_empty(&raw.blobstore_disk_location);

    match (bucket, disk_location) {
        (Some(_), Some(_)) => Err(ConfigError::MutualExclusion {
            section: Section::Blobstore,
            fields: vec!["blobstore_s3_bucket", "blobstore_disk_location"],
        }),
        (Some(bucket), None) => Ok(BlobstoreConfig::S3(S3BlobstoreConfig {
            bucket: bucket.to_owned(),
            region: raw.blobstore_s3_region.clone(),
            endpoint: raw.blobstore_s3_endpoint.clone(),
            force_path_style: raw.blobstore_s3_force_path_style,
            credentials: s3_credentials(raw)?,
        })),
        (None, Some(location)) => Ok(BlobstoreConfig::Disk(DiskBlobstoreConfig {
            location: PathBuf::from(location),
            temp_location: raw.blobstore_disk_tmp_location.as_ref().map(PathBuf::from),
        })),
        (None, None) => Err(ConfigError::MissingRequired {
            section: Section::Blobstore,
            fields: vec!["blobstore_s3_bucket", "blobstore_disk_location"],
            reason: "must configure either the s3 or the disk blobstore",
        }),
    }
}

// Only the credential pair is all-or-nothing; region, endpoint and
// path style are independently optional.
fn s3_credentials(raw: &RawEnvironment) -> Result<Option<S3Credentials>, ConfigError> {
    match (
        non_empty(&raw.blobstore_s3_access_key_id),
        non_empty(&raw.blobstore_s3_secret_access_key),
    ) {
        (None, None) => Ok(None),
        (Some(access_key_id), Some(secret_access_key)) => Ok(Some(S3Credentials {
            access_key_id: access_key_id.to_owned(),
            secret_access_key: secret_access_key.to_owned(),
        })),
        _ => Err(ConfigError::MissingRequired {
            section: Section::Blobstore,
            fields: vec![
                "blobstore_s3_access_key_id",
                "blobstore_s3_secret_access_key",
            ],
            reason: "must set both s3 access key id and secret access key",
        }),
    }
}
