//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// Loads and validates an `aion.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join("aion.toml");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates an `aion.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.project.top.is_empty() {
        return Err(ConfigError::MissingField("project.top".to_string()));
    }
    if config.coverage.max_width == 0 {
        return Err(ConfigError::ValidationError(
            "coverage.max_width must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
[project]
name = "uart"
version = "0.1.0"
top = "uart_top"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.name, "uart");
        assert_eq!(config.project.top, "uart_top");
        assert!(!config.coverage.any_enabled());
    }

    #[test]
    fn parse_coverage_table() {
        let toml = r#"
[project]
name = "uart"
version = "0.1.0"
top = "uart_top"

[coverage]
line = true
toggle = true
user = true
trace = true
max_width = 1024
underscore = true
"#;
        let cov = load_config_from_str(toml).unwrap().coverage;
        assert!(cov.line && cov.toggle && cov.user && cov.trace && cov.underscore);
        assert_eq!(cov.max_width, 1024);
    }

    #[test]
    fn zero_max_width_rejected() {
        let toml = r#"
[project]
name = "uart"
version = "0.1.0"
top = "uart_top"

[coverage]
max_width = 0
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn missing_top_errors() {
        let toml = r#"
[project]
name = "uart"
version = "0.1.0"
top = ""
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("aion.toml"),
            "[project]\nname = \"x\"\nversion = \"0.1.0\"\ntop = \"x\"\n[coverage]\nline = true\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert!(config.coverage.line);
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
