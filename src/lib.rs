//! Resolves a PDS server's flat operator environment into one validated,
//! strongly typed [`ServerConfig`].
//!
//! ```no_run
//! let config = pds_config::load_from_env()?;
//! println!("serving {}", config.service.public_url);
//! # Ok::<(), pds_config::Error>(())
//! ```

pub mod config;
pub mod dev_env;
pub mod env;
mod error;

pub use config::{resolve, resolve_with, ConfigError, Defaults, ServerConfig};
pub use dev_env::DevEnvironment;
pub use env::{EnvLoader, RawEnvironment, SourceError};
pub use error::Error;

/// Loads `PDS_*` variables from the process environment and resolves them.
pub fn load_from_env() -> Result<ServerConfig, Error> {
    let raw = RawEnvironment::from_env()?;
    Ok(resolve(&raw)?)
}
