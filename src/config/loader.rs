//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::PrettifyConfig;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Load a configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<PrettifyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: PrettifyConfig = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("axum-prettify-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/nonexistent/prettify.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let path = temp_path("invalid.toml");
        fs::write(&path, "always_on = [not toml").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_valid_toml() {
        let path = temp_path("valid.toml");
        fs::write(&path, "always_on = true\n[format]\nindent_width = 3\n").unwrap();
        let config = load_config(&path).unwrap();
        assert!(config.always_on);
        assert_eq!(config.format.indent_width, 3);
        let _ = fs::remove_file(&path);
    }
}
