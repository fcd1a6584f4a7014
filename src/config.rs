use std::str::FromStr;

use tracing::Level;

pub const DEFAULT_API_BASE_URL: &str = "https://togglenest-backend-1-6utk.onrender.com/api";
pub const DEFAULT_TOKEN_STORAGE_KEY: &str = "token";

/// Runtime settings for the board. Values are baked in at build time from
/// `TOGGLENEST_API_URL`, `TOGGLENEST_STATUS_RETRIES` and `TOGGLENEST_LOG`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    /// localStorage key holding the bearer token written by the login screen.
    pub token_storage_key: String,
    /// Extra attempts for a status change that failed with a network error.
    pub status_retries: u32,
    pub log_level: Level,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_storage_key: DEFAULT_TOKEN_STORAGE_KEY.to_string(),
            status_retries: 0,
            log_level: Level::INFO,
        }
    }
}

impl AppConfig {
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("TOGGLENEST_API_URL"),
            option_env!("TOGGLENEST_STATUS_RETRIES"),
            option_env!("TOGGLENEST_LOG"),
        )
    }

    /// Unparseable or empty values fall back to the defaults.
    pub fn from_values(api_url: Option<&str>, retries: Option<&str>, log: Option<&str>) -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: api_url
                .map(|url| url.trim().trim_end_matches('/'))
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .unwrap_or(defaults.api_base_url),
            token_storage_key: defaults.token_storage_key,
            status_retries: retries
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.status_retries),
            log_level: log
                .and_then(|v| Level::from_str(v.trim()).ok())
                .unwrap_or(defaults.log_level),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_values_use_defaults() {
        assert_eq!(AppConfig::from_values(None, None, None), AppConfig::default());
    }

    #[test]
    fn overrides_are_parsed_and_normalised() {
        let config = AppConfig::from_values(Some("http://localhost:5000/api/"), Some("2"), Some("debug"));
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.status_retries, 2);
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.endpoint("/tasks"), "http://localhost:5000/api/tasks");
    }

    #[test]
    fn garbage_falls_back() {
        let config = AppConfig::from_values(Some("  "), Some("many"), Some("loud"));
        assert_eq!(config, AppConfig::default());
    }
}
