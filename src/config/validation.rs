use crate::config::types::{parse_deadline, Config, CrawlConfig, TrafficConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_traffic_config(&config.traffic)?;
    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.source.is_empty() {
        return Err(ConfigError::Validation("source cannot be empty".to_string()));
    }

    parse_deadline(&config.deadline)?;

    if config.name.is_empty() {
        return Err(ConfigError::Validation("name cannot be empty".to_string()));
    }

    // The name lands inside the state file name; keep it path-safe.
    if config.name.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "name must not contain path separators, got '{}'",
            config.name
        )));
    }

    Ok(())
}

/// Validates traffic service configuration
fn validate_traffic_config(config: &TrafficConfig) -> Result<(), ConfigError> {
    if config.endpoint.is_empty() {
        return Err(ConfigError::Validation(
            "traffic endpoint cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(&config.endpoint).map_err(|e| {
        ConfigError::Validation(format!("traffic endpoint is not a valid URL: {}", e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "traffic endpoint must be http(s), got '{}'",
            url.scheme()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::OutputConfig;

    fn valid_config() -> Config {
        Config {
            crawl: CrawlConfig {
                source: "icodrops.com".to_string(),
                deadline: "2019/05/01".to_string(),
                interval_ms: 1000,
                name: "may-run".to_string(),
            },
            output: OutputConfig::default(),
            traffic: TrafficConfig {
                endpoint: "https://data.example.com".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_source_rejected() {
        let mut config = valid_config();
        config.crawl.source = String::new();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_bad_deadline_rejected() {
        let mut config = valid_config();
        config.crawl.deadline = "May 1st 2019".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_dashed_deadline_accepted() {
        let mut config = valid_config();
        config.crawl.deadline = "2019-05-01".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_name_with_path_separator_rejected() {
        let mut config = valid_config();
        config.crawl.name = "../escape".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_non_http_endpoint_rejected() {
        let mut config = valid_config();
        config.traffic.endpoint = "ftp://data.example.com".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_unparseable_endpoint_rejected() {
        let mut config = valid_config();
        config.traffic.endpoint = "not a url".to_string();
        assert!(validate(&config).is_err());
    }
}
