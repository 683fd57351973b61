use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[platform]
base-url = "https://www.example.com"

[http]
min-delay-ms = 1200
max-delay-ms = 3500
max-retries = 3
retry-delay-ms = 2000

[credentials]
cookie-path = "cookies/cookies.json"
refresh-command = ["python3", "get_cookie.py"]

[scrape]
page-size = 30
max-page = 100
data-dir = "jsons"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.platform.base_url, "https://www.example.com");
        assert_eq!(config.http.max_retries, 3);
        // Defaults fill in the omitted keys
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.scrape.stop_flag, "stop_scraping.flag");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[platform]
base-url = "https://www.example.com"

[http]
min-delay-ms = 9000
max-delay-ms = 3500
max-retries = 3
retry-delay-ms = 2000

[credentials]
cookie-path = "cookies/cookies.json"
refresh-command = ["python3", "get_cookie.py"]

[scrape]
page-size = 30
max-page = 100
data-dir = "jsons"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
