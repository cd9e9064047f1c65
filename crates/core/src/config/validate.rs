use super::{types::Config, ConfigError};

/// Validates a loaded configuration before the pipeline is wired up.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.osu.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "osu.api_key must not be empty".to_string(),
        ));
    }

    if config.resolver.recent_limit == 0 {
        return Err(ConfigError::ValidationError(
            "resolver.recent_limit must be at least 1".to_string(),
        ));
    }

    if config.oppai.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "oppai.timeout_secs must be at least 1".to_string(),
        ));
    }

    if config.reddit.subreddit.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "reddit.subreddit must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::load_config_from_str;
    use super::*;

    fn valid_config() -> Config {
        load_config_from_str(
            r#"
[osu]
api_key = "k"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let mut config = valid_config();
        config.osu.api_key = "  ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_zero_recent_limit_rejected() {
        let mut config = valid_config();
        config.resolver.recent_limit = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_tool_timeout_rejected() {
        let mut config = valid_config();
        config.oppai.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_subreddit_rejected() {
        let mut config = valid_config();
        config.reddit.subreddit = String::new();
        assert!(validate_config(&config).is_err());
    }
}
