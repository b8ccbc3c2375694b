use chrono::Duration;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::model::common::AccountId;

/// Configuration file read by [`Config::load`], searched for from the working directory upwards.
pub const CONFIG_FILE: &str = "Ledger.toml";
/// Prefix of environment variables overriding the configuration file.
pub const ENV_PREFIX: &str = "LEDGER_";
/// Default minimum election length: one hour.
pub const DEFAULT_MIN_DURATION: u64 = 3600;

/// Ledger configuration, derived from `Ledger.toml` and `LEDGER_*`
/// environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// The account that owns a freshly created ledger.
    admin: AccountId,
    /// Minimum length of an election window, in seconds.
    #[serde(default = "default_min_duration")]
    min_duration: u64,
}

fn default_min_duration() -> u64 {
    DEFAULT_MIN_DURATION
}

impl Config {
    /// A configuration with the given admin and default settings otherwise.
    pub fn new(admin: impl Into<AccountId>) -> Self {
        Self {
            admin: admin.into(),
            min_duration: DEFAULT_MIN_DURATION,
        }
    }

    pub fn with_min_duration(mut self, seconds: u64) -> Self {
        self.min_duration = seconds;
        self
    }

    /// The layered configuration sources: `Ledger.toml`, then `LEDGER_*` variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::default("min_duration", DEFAULT_MIN_DURATION))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load the configuration from its usual sources.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    /// The initial admin account.
    /// Configured via `LEDGER_ADMIN`.
    pub fn admin(&self) -> &AccountId {
        &self.admin
    }

    /// Minimum length of an election window.
    /// Configured via `LEDGER_MIN_DURATION`, in seconds.
    pub fn min_duration(&self) -> Duration {
        Duration::seconds(i64::try_from(self.min_duration).unwrap_or(i64::MAX))
    }
}
