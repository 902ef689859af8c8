use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("SEARCH_BACKEND_URL must be an http(s) URL, got '{0}'")]
    InvalidBackendUrl(String),
    #[error("SEARCH_TIMEOUT_SECS must be a positive integer, got '{0}'")]
    InvalidTimeout(String),
}

/// Where the server forwards `/api/search` and `/api/follow-up`.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = match lookup("SEARCH_BACKEND_URL") {
            Some(url) => {
                let url = url.trim().trim_end_matches('/').to_string();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidBackendUrl(url));
                }
                url
            }
            None => {
                log::warn!("SEARCH_BACKEND_URL not set, using {}", DEFAULT_BACKEND_URL);
                DEFAULT_BACKEND_URL.to_string()
            }
        };

        let timeout_secs = match lookup("SEARCH_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout(raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BackendConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = BackendConfig::from_lookup(lookup(&[
            ("SEARCH_BACKEND_URL", "https://search.internal:9000/"),
            ("SEARCH_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://search.internal:9000");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert_eq!(
            BackendConfig::from_lookup(lookup(&[("SEARCH_BACKEND_URL", "ftp://x")])),
            Err(ConfigError::InvalidBackendUrl("ftp://x".to_string()))
        );
        assert_eq!(
            BackendConfig::from_lookup(lookup(&[("SEARCH_TIMEOUT_SECS", "0")])),
            Err(ConfigError::InvalidTimeout("0".to_string()))
        );
        assert!(matches!(
            BackendConfig::from_lookup(lookup(&[("SEARCH_TIMEOUT_SECS", "soon")])),
            Err(ConfigError::InvalidTimeout(_))
        ));
    }
}
