//! Settings loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::RotatorConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for settings loading.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate settings from a TOML file.
pub fn load_config(path: &Path) -> Result<RotatorConfig, SettingsError> {
    let content = fs::read_to_string(path)?;
    let config: RotatorConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(SettingsError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_settings(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_a_minimal_settings_file() {
        let file = write_settings(
            r#"
            [source]
            domains = ["https://mirror-a.example.com", "https://mirror-b.example.com"]
            "#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.source.domains.len(), 2);
        assert_eq!(config.probe.timeout_ms, 3_000);
        assert_eq!(config.scheduler.poll_interval_ms, 30_000);
        assert!(config.blocklist.is_none());
    }

    #[test]
    fn loads_blocklist_and_order_sections() {
        let file = write_settings(
            r#"
            order = "sticky"

            [source]
            url = "https://cdn.example.com/domains.json"

            [blocklist]
            endpoint = "https://authority.example.com/check"
            api_key = "secret"
            "#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.order, crate::config::schema::OrderPolicyKind::Sticky);
        assert_eq!(config.blocklist.unwrap().api_key, "secret");
    }

    #[test]
    fn rejects_invalid_toml() {
        let file = write_settings("source = [broken");
        assert!(matches!(
            load_config(file.path()),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn rejects_semantically_invalid_settings() {
        let file = write_settings(
            r#"
            [probe]
            timeout_ms = 0

            [source]
            domains = ["https://mirror-a.example.com"]
            "#,
        );
        assert!(matches!(
            load_config(file.path()),
            Err(SettingsError::Validation(_))
        ));
    }
}
