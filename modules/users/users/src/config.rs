use std::time::Duration;

use roster_http::{HttpClient, HttpError};
use serde::{Deserialize, Serialize};
use url::Url;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Configuration for the users module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct UsersConfig {
    /// Root of the REST API; `/api/v1/...` paths are appended to it.
    pub base_url: Url,

    /// Per-request timeout, e.g. `"10s"`. Unset means wait indefinitely.
    #[serde(with = "humantime_opt", skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<Duration>,

    pub user_agent: String,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: None,
            user_agent: concat!("roster/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

#[allow(clippy::expect_used)]
fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("base URL '{url}' cannot carry a path")]
    CannotBeABase { url: String },
    #[error("base URL '{url}' must use http or https")]
    UnsupportedScheme { url: String },
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] HttpError),
}

impl UsersConfig {
    /// Check the base URL before any request is made.
    ///
    /// # Errors
    /// Returns `ConfigError` for non-HTTP schemes or URLs that cannot be extended with a path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.cannot_be_a_base() {
            return Err(ConfigError::CannotBeABase {
                url: self.base_url.to_string(),
            });
        }
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                url: self.base_url.to_string(),
            });
        }
        Ok(())
    }

    /// Build the HTTP client for this configuration.
    ///
    /// Plain `http://` base URLs (the local default) enable insecure transport.
    /// Must be called inside a Tokio runtime.
    ///
    /// # Errors
    /// Returns `ConfigError` if the config is invalid or the client cannot be built.
    pub fn http_client(&self) -> Result<HttpClient, ConfigError> {
        self.validate()?;

        let mut builder = HttpClient::builder().user_agent(self.user_agent.clone());
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        if self.base_url.scheme() == "http" {
            builder = builder.allow_plain_http();
        }
        Ok(builder.build()?)
    }

    /// URL of `path` under the configured base, e.g. `endpoint(&["api", "v1", "users"])`.
    ///
    /// # Errors
    /// Returns `ConfigError::CannotBeABase` for URLs like `mailto:`.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ConfigError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ConfigError::CannotBeABase {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

mod humantime_opt {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_str(&humantime::format_duration(*d).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|r| humantime::parse_duration(&r).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = UsersConfig::default();
        assert_eq!(config.base_url.as_str(), "http://localhost:3001/");
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn parses_humantime_timeout() {
        let config: UsersConfig = serde_json::from_value(json!({
            "base_url": "https://api.example.com",
            "request_timeout": "1500ms"
        }))
        .unwrap();
        assert_eq!(config.request_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(config.base_url.host_str(), Some("api.example.com"));
    }

    #[test]
    fn rejects_bad_timeout() {
        let result: Result<UsersConfig, _> =
            serde_json::from_value(json!({ "request_timeout": "soon" }));
        assert!(result.is_err());
    }

    #[test]
    fn endpoint_appends_segments() {
        let config = UsersConfig::default();
        let url = config.endpoint(&["api", "v1", "users"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3001/api/v1/users");

        let prefixed = UsersConfig {
            base_url: Url::parse("https://example.com/backend/").unwrap(),
            ..UsersConfig::default()
        };
        let url = prefixed.endpoint(&["api", "v1", "hello"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/backend/api/v1/hello");
    }

    #[test]
    fn validate_rejects_non_http_scheme() {
        let config = UsersConfig {
            base_url: Url::parse("ftp://example.com").unwrap(),
            ..UsersConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedScheme { .. })
        ));
    }
}
