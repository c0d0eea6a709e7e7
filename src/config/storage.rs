use std::path::{Path, PathBuf};

use super::Defaults;
use crate::RawEnvironment;

const ACCOUNT_DB_NAME: &str = "account.sqlite";
const SEQUENCER_DB_NAME: &str = "sequencer.sqlite";
const DID_CACHE_DB_NAME: &str = "did_cache.sqlite";
const ACTOR_STORE_DIR_NAME: &str = "actors";

/// Locations of the service-wide sqlite databases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub account_db_location: PathBuf,
    pub sequencer_db_location: PathBuf,
    pub did_cache_db_location: PathBuf,
    pub disable_wal_auto_checkpoint: bool,
}

/// Per-account repository storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorStoreConfig {
    pub directory: PathBuf,
    pub cache_size: usize,
    pub disable_wal_auto_checkpoint: bool,
}

/// `<data_directory>/<name>`, or bare `<name>` without a data directory.
fn data_location(raw: &RawEnvironment, name: &str) -> PathBuf {
    match &raw.data_directory {
        Some(dir) => Path::new(dir).join(name),
        None => PathBuf::from(name),
    }
}

fn location(explicit: &Option<String>, raw: &RawEnvironment, name: &str) -> PathBuf {
    explicit
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| data_location(raw, name))
}

pub(super) fn build_database(raw: &RawEnvironment) -> DatabaseConfig {
    DatabaseConfig {
        account_db_location: location(&raw.account_db_location, raw, ACCOUNT_DB_NAME),
        sequencer_db_location: location(&raw.sequencer_db_location, raw, SEQUENCER_DB_NAME),
        did_cache_db_location: location(&raw.did_cache_db_location, raw, DID_CACHE_DB_NAME),
        disable_wal_auto_checkpoint: raw.disable_wal_auto_checkpoint.unwrap_or(false),
    }
}

pub(super) fn build_actor_store(raw: &RawEnvironment, defaults: &Defaults) -> ActorStoreConfig {
    ActorStoreConfig {
        directory: location(&raw.actor_store_directory, raw, ACTOR_STORE_DIR_NAME),
        cache_size: raw
            .actor_store_cache_size
            .unwrap_or(defaults.actor_store_cache_size),
        disable_wal_auto_checkpoint: raw.disable_wal_auto_checkpoint.unwrap_or(false),
    }
}
