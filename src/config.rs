//! Runtime settings from the environment (and `.env`, when present).

use std::{path::PathBuf, time::Duration};

pub const DEFAULT_AUTH_URL: &str = "http://localhost:3001";
pub const DEFAULT_USER_URL: &str = "http://localhost:3002";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub auth_url: String,
    pub user_url: String,
    pub gemini_url: String,
    pub gemini_api_key: Option<String>,
    /// Replaces the embedded rate table when set.
    pub rates_file: Option<PathBuf>,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_string(),
            user_url: DEFAULT_USER_URL.to_string(),
            gemini_url: DEFAULT_GEMINI_URL.to_string(),
            gemini_api_key: None,
            rates_file: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let request_timeout = get("BABEL_REQUEST_TIMEOUT_SECS")
            .and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(err) => {
                    tracing::warn!("ignoring BABEL_REQUEST_TIMEOUT_SECS={raw}: {err}");
                    None
                }
            })
            .unwrap_or(defaults.request_timeout);

        Self {
            auth_url: get("BABEL_AUTH_URL").unwrap_or(defaults.auth_url),
            user_url: get("BABEL_USER_URL").unwrap_or(defaults.user_url),
            gemini_url: get("GEMINI_BASE_URL").unwrap_or(defaults.gemini_url),
            gemini_api_key: get("GEMINI_API_KEY").or_else(|| get("API_KEY")),
            rates_file: get("BABEL_RATES_FILE").map(PathBuf::from),
            request_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_match_local_services() {
        let config = config_from(&[]);
        assert_eq!(config, Config::default());
        assert_eq!(config.auth_url, "http://localhost:3001");
        assert_eq!(config.user_url, "http://localhost:3002");
    }

    #[test]
    fn overrides_and_blank_values() {
        let config = config_from(&[
            ("BABEL_AUTH_URL", "https://auth.example"),
            ("BABEL_USER_URL", "   "),
            ("API_KEY", "legacy-key"),
            ("BABEL_RATES_FILE", "/etc/babel/rates.json"),
            ("BABEL_REQUEST_TIMEOUT_SECS", "5"),
        ]);
        assert_eq!(config.auth_url, "https://auth.example");
        assert_eq!(config.user_url, DEFAULT_USER_URL);
        assert_eq!(config.gemini_api_key.as_deref(), Some("legacy-key"));
        assert_eq!(config.rates_file, Some(PathBuf::from("/etc/babel/rates.json")));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_timeout_keeps_default() {
        let config = config_from(&[("BABEL_REQUEST_TIMEOUT_SECS", "soon")]);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }
}
