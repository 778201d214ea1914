//! Configuration loading and validation for `sealctl`.
//!
//! All values are read from `SEALCTL_`-prefixed environment variables at
//! startup. The process exits with a clear error message if any required
//! variable is missing or invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated `sealctl` configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Password fed to the KDF to produce the envelope key. **Required.**
    pub passphrase: String,

    /// KDF salt. **Required.**
    pub kdf_salt: String,

    /// KDF rounds per output block.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_kdf_iterations() -> u32 {
    1000
}
fn default_log_level() -> String {
    "info".into()
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("passphrase", &"[REDACTED]")
            .field("kdf_salt", &self.kdf_salt)
            .field("kdf_iterations", &self.kdf_iterations)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::load(config::Environment::with_prefix("SEALCTL"))
    }

    fn load(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.passphrase, "SEALCTL_PASSPHRASE")?;
        ensure_non_empty(&self.kdf_salt, "SEALCTL_KDF_SALT")?;

        if self.kdf_iterations == 0 {
            anyhow::bail!("SEALCTL_KDF_ITERATIONS must be > 0");
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
