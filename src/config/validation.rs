use crate::config::types::{ArtifactConfig, Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_artifact_config(&config.artifact)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.search_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid search_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "search_url must use http or https, got '{}'",
            config.search_url
        )));
    }

    if config.detail_pattern.is_empty() {
        return Err(ConfigError::Validation(
            "detail_pattern cannot be empty".to_string(),
        ));
    }

    if config.max_attempts < 1 || config.max_attempts > 10 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be between 1 and 10, got {}",
            config.max_attempts
        )));
    }

    if config.workers > 256 {
        return Err(ConfigError::Validation(format!(
            "workers must be at most 256, got {}",
            config.workers
        )));
    }

    if config.request_timeout == 0 {
        return Err(ConfigError::Validation(
            "request_timeout must be at least 1 second".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.output_dir.is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    if config.artifact_dir.is_empty() {
        return Err(ConfigError::Validation(
            "artifact_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates artifact configuration
fn validate_artifact_config(config: &ArtifactConfig) -> Result<(), ConfigError> {
    if config.link_pattern.is_empty() {
        return Err(ConfigError::Validation(
            "link_pattern cannot be empty".to_string(),
        ));
    }

    if config.converter.trim().is_empty() {
        return Err(ConfigError::Validation(
            "converter cannot be empty".to_string(),
        ));
    }

    // An empty entry would match everywhere and remove nothing useful
    if config.boilerplate.iter().any(|s| s.is_empty()) {
        return Err(ConfigError::Validation(
            "boilerplate entries cannot be empty".to_string(),
        ));
    }

    Ok(())
}
