//! Process configuration.
//!
//! Read once at startup from the environment; the binary may override the
//! defaults with CLI flags. Serving never starts without the credential
//! pair.

use thiserror::Error;
use trello_client::DEFAULT_BASE_URL;

pub const ENV_API_KEY: &str = "TRELLO_API_KEY";
pub const ENV_API_TOKEN: &str = "TRELLO_TOKEN";
pub const ENV_BOARD_ID: &str = "TRELLO_BOARD_ID";
pub const ENV_LIST_NAME: &str = "TRELLO_LIST_NAME";
pub const ENV_BASE_URL: &str = "TRELLO_BASE_URL";

/// Applied when `TRELLO_LIST_NAME` is unset. An explicitly empty value
/// disables list narrowing instead.
pub const DEFAULT_LIST_FILTER: &str = "Today Dashboard";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{ENV_API_KEY} and {ENV_API_TOKEN} must be set in the environment")]
    MissingCredentials,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_key: String,
    pub api_token: String,
    pub base_url: String,
    pub default_board_id: Option<String>,
    pub default_list_filter: Option<String>,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(|name| std::env::var(name).ok())
    }

    /// Build from an injected lookup so tests avoid process-global env state.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(ENV_API_KEY).filter(|v| !v.is_empty());
        let api_token = lookup(ENV_API_TOKEN).filter(|v| !v.is_empty());
        let (api_key, api_token) = match (api_key, api_token) {
            (Some(key), Some(token)) => (key, token),
            _ => return Err(ConfigError::MissingCredentials),
        };

        let default_board_id = lookup(ENV_BOARD_ID).filter(|v| !v.trim().is_empty());
        let default_list_filter = match lookup(ENV_LIST_NAME) {
            Some(value) if value.trim().is_empty() => None,
            Some(value) => Some(value),
            None => Some(DEFAULT_LIST_FILTER.to_string()),
        };
        let base_url =
            lookup(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self { api_key, api_token, base_url, default_board_id, default_list_filter })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |name| map.get(name).map(|v| v.to_string())
    }

    #[test]
    fn missing_credentials_is_fatal() {
        let err = GatewayConfig::resolve(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials));

        let err = GatewayConfig::resolve(lookup_from(&[(ENV_API_KEY, "k")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials));
    }

    #[test]
    fn list_filter_defaults_and_empty_disables() {
        let config =
            GatewayConfig::resolve(lookup_from(&[(ENV_API_KEY, "k"), (ENV_API_TOKEN, "t")]))
                .unwrap();
        assert_eq!(config.default_list_filter.as_deref(), Some(DEFAULT_LIST_FILTER));
        assert!(config.default_board_id.is_none());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        let config = GatewayConfig::resolve(lookup_from(&[
            (ENV_API_KEY, "k"),
            (ENV_API_TOKEN, "t"),
            (ENV_LIST_NAME, ""),
        ]))
        .unwrap();
        assert!(config.default_list_filter.is_none());
    }

    #[test]
    fn board_and_base_url_come_from_environment() {
        let config = GatewayConfig::resolve(lookup_from(&[
            (ENV_API_KEY, "k"),
            (ENV_API_TOKEN, "t"),
            (ENV_BOARD_ID, "board-9"),
            (ENV_LIST_NAME, "Sprint"),
            (ENV_BASE_URL, "http://localhost:9999"),
        ]))
        .unwrap();
        assert_eq!(config.default_board_id.as_deref(), Some("board-9"));
        assert_eq!(config.default_list_filter.as_deref(), Some("Sprint"));
        assert_eq!(config.base_url, "http://localhost:9999");
    }
}
