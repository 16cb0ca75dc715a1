//! Application configuration.
//!
//! Layered as: defaults -> YAML file (if provided) -> env (`ROSTER__*`) -> CLI overrides.

use std::path::Path;

use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use url::Url;
use users::UsersConfig;

/// Environment prefix; `ROSTER__USERS__BASE_URL` maps to `users.base_url`.
pub const ENV_PREFIX: &str = "ROSTER__";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    const ALL: [LogLevel; 5] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    /// Raise verbosity by `steps`, saturating at `Trace`.
    #[must_use]
    pub fn raised(self, steps: u8) -> Self {
        let idx = (self as usize).saturating_add(usize::from(steps));
        Self::ALL[idx.min(Self::ALL.len() - 1)]
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub users: UsersConfig,
}

/// Values given on the command line; they win over every other layer.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub base_url: Option<Url>,
    pub verbose: u8,
}

impl AppConfig {
    /// Load the layered configuration.
    ///
    /// # Errors
    /// Fails if an explicit file is missing, any layer does not parse, or the
    /// resulting users config is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if let Some(path) = path {
            if !path.is_file() {
                bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Self = figment
            .extract()
            .context("failed to load configuration")?;
        config
            .users
            .validate()
            .context("invalid users configuration")?;
        Ok(config)
    }

    /// Apply CLI overrides on top of the loaded layers.
    ///
    /// # Errors
    /// Fails if the overridden base URL is not usable.
    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) -> Result<()> {
        if let Some(url) = &overrides.base_url {
            self.users.base_url = url.clone();
            self.users
                .validate()
                .context("invalid --base-url")?;
        }
        self.logging.level = self.logging.level.raised(overrides.verbose);
        Ok(())
    }

    /// Pretty JSON rendering for `roster check`.
    ///
    /// # Errors
    /// Only if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to render configuration")
    }
}
