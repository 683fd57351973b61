use crate::config::types::Config;
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Validates a parsed configuration
///
/// Checks the cross-field constraints TOML typing cannot express.
pub fn validate(config: &Config) -> ConfigResult<()> {
    let base = Url::parse(&config.platform.base_url)
        .map_err(|e| ConfigError::Validation(format!("platform.base-url: {}", e)))?;
    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "platform.base-url must be http(s), got {}",
            base.scheme()
        )));
    }

    if config.http.min_delay_ms > config.http.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "http.min-delay-ms ({}) exceeds http.max-delay-ms ({})",
            config.http.min_delay_ms, config.http.max_delay_ms
        )));
    }

    if config.http.max_retries == 0 {
        return Err(ConfigError::Validation(
            "http.max-retries must be at least 1".to_string(),
        ));
    }

    if config.credentials.cookie_path.is_empty() {
        return Err(ConfigError::Validation(
            "credentials.cookie-path must not be empty".to_string(),
        ));
    }

    if config.credentials.refresh_command.is_empty() {
        return Err(ConfigError::Validation(
            "credentials.refresh-command must not be empty".to_string(),
        ));
    }

    if config.scrape.page_size == 0 {
        return Err(ConfigError::Validation(
            "scrape.page-size must be at least 1".to_string(),
        ));
    }

    if config.scrape.max_page == 0 {
        return Err(ConfigError::Validation(
            "scrape.max-page must be at least 1".to_string(),
        ));
    }

    if config.scrape.data_dir.is_empty() {
        return Err(ConfigError::Validation(
            "scrape.data-dir must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{CredentialConfig, HttpConfig, PlatformConfig, ScrapeConfig};

    fn valid_config() -> Config {
        Config {
            platform: PlatformConfig {
                base_url: "https://www.example.com".to_string(),
            },
            http: HttpConfig {
                min_delay_ms: 1200,
                max_delay_ms: 3500,
                max_retries: 3,
                retry_delay_ms: 2000,
                timeout_secs: 30,
            },
            credentials: CredentialConfig {
                cookie_path: "cookies/cookies.json".to_string(),
                refresh_command: vec!["python3".to_string(), "get_cookie.py".to_string()],
            },
            scrape: ScrapeConfig {
                page_size: 30,
                max_page: 100,
                data_dir: "jsons".to_string(),
                stop_flag: "stop_scraping.flag".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_inverted_delay_range_rejected() {
        let mut config = valid_config();
        config.http.min_delay_ms = 5000;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_retries_rejected() {
        let mut config = valid_config();
        config.http.max_retries = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let mut config = valid_config();
        config.platform.base_url = "ftp://example.com".to_string();
        assert!(validate(&config).is_err());

        config.platform.base_url = "not a url".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_refresh_command_rejected() {
        let mut config = valid_config();
        config.credentials.refresh_command = vec![];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut config = valid_config();
        config.scrape.page_size = 0;
        assert!(validate(&config).is_err());
    }
}
