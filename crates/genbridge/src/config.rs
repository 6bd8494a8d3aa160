use std::env;
use std::error::Error;
use std::fmt::{self, Display};
use std::time::Duration;

use genbridge_core::chat::DEFAULT_TURN_LIMIT;
use genbridge_http_service::{
    DEFAULT_BASE_URL, DEFAULT_CAPTION_PATH, ServiceConfig, ServiceConfigBuilder,
};

/// Environment variable holding the base URL of the service.
pub const BASE_URL_VAR: &str = "GENBRIDGE_BASE_URL";
/// Environment variable holding the path of the captioning endpoint.
pub const CAPTION_PATH_VAR: &str = "GENBRIDGE_CAPTION_PATH";
/// Environment variable holding the request timeout, in seconds.
pub const TIMEOUT_SECS_VAR: &str = "GENBRIDGE_TIMEOUT_SECS";
/// Environment variable holding how many user messages a chat accepts.
pub const CHAT_TURN_LIMIT_VAR: &str = "GENBRIDGE_CHAT_TURN_LIMIT";

/// An error returned when a configuration value can't be used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigError {
    key: &'static str,
    value: String,
    reason: &'static str,
}

impl ConfigError {
    /// Returns the name of the offending variable.
    #[inline]
    pub fn key(&self) -> &str {
        self.key
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} {:?}: {}", self.key, self.value, self.reason)
    }
}

impl Error for ConfigError {}

/// Settings of the app.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the service.
    pub base_url: String,
    /// Path of the captioning endpoint.
    pub caption_path: String,
    /// Request timeout, none by default.
    pub timeout: Option<Duration>,
    /// How many user messages a chat session accepts.
    pub turn_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            caption_path: DEFAULT_CAPTION_PATH.to_owned(),
            timeout: None,
            turn_limit: DEFAULT_TURN_LIMIT,
        }
    }
}

impl Config {
    /// Reads the settings from the process environment. Unset or empty
    /// variables fall back to the defaults.
    #[inline]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the settings through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(base_url) = get(BASE_URL_VAR) {
            if !base_url.starts_with("http://")
                && !base_url.starts_with("https://")
            {
                return Err(ConfigError {
                    key: BASE_URL_VAR,
                    value: base_url,
                    reason: "expected an http or https URL",
                });
            }
            config.base_url = base_url;
        }
        if let Some(path) = get(CAPTION_PATH_VAR) {
            config.caption_path = path;
        }
        if let Some(value) = get(TIMEOUT_SECS_VAR) {
            match value.parse::<u64>() {
                Ok(0) => config.timeout = None,
                Ok(secs) => config.timeout = Some(Duration::from_secs(secs)),
                Err(_) => {
                    return Err(ConfigError {
                        key: TIMEOUT_SECS_VAR,
                        value,
                        reason: "expected a whole number of seconds",
                    });
                }
            }
        }
        if let Some(value) = get(CHAT_TURN_LIMIT_VAR) {
            match value.parse::<u32>() {
                Ok(limit) if limit > 0 => config.turn_limit = limit,
                _ => {
                    return Err(ConfigError {
                        key: CHAT_TURN_LIMIT_VAR,
                        value,
                        reason: "expected a positive number",
                    });
                }
            }
        }
        Ok(config)
    }

    /// Builds the configuration of the HTTP service.
    pub fn service_config(&self) -> ServiceConfig {
        let builder = ServiceConfigBuilder::with_base_url(&self.base_url)
            .with_caption_path(&self.caption_path);
        match self.timeout {
            Some(timeout) => builder.with_timeout(timeout),
            None => builder,
        }
        .build()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(
        vars: &[(&str, &str)],
    ) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());

        let service = config.service_config();
        assert_eq!(service.chat_url(), "http://localhost:8000/chat/");
        assert_eq!(
            service.caption_url(),
            "http://localhost:8000/caption-image/"
        );
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (BASE_URL_VAR, "https://genz.example/api/"),
            (CAPTION_PATH_VAR, "/describe-image/"),
            (TIMEOUT_SECS_VAR, "30"),
            (CHAT_TURN_LIMIT_VAR, "3"),
        ]))
        .unwrap();
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.turn_limit, 3);
        assert_eq!(
            config.service_config().caption_url(),
            "https://genz.example/api/describe-image/"
        );
    }

    #[test]
    fn test_empty_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            (BASE_URL_VAR, "  "),
            (TIMEOUT_SECS_VAR, "0"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup(&[(TIMEOUT_SECS_VAR, "soon")]))
            .unwrap_err();
        assert_eq!(err.key(), TIMEOUT_SECS_VAR);
        assert!(err.to_string().contains("whole number"));

        let err =
            Config::from_lookup(lookup(&[(CHAT_TURN_LIMIT_VAR, "0")]))
                .unwrap_err();
        assert_eq!(err.key(), CHAT_TURN_LIMIT_VAR);

        let err =
            Config::from_lookup(lookup(&[(BASE_URL_VAR, "localhost:8000")]))
                .unwrap_err();
        assert_eq!(err.key(), BASE_URL_VAR);
    }
}
