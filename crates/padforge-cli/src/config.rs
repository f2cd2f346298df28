//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use padforge::{PadforgeError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for PadforgeError {
    fn from(err: ConfigError) -> Self {
        PadforgeError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (padforge/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
/// - A limit is set to zero
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, PadforgeError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("padforge/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "padforge", "padforge") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load and validate configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, PadforgeError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let limits = config.limits();
    let zero = [
        ("timeout_ms", limits.timeout().is_zero()),
        ("max_operations", limits.max_operations() == 0),
        ("max_call_depth", limits.max_call_depth() == 0),
        ("max_nesting", limits.max_nesting() == 0),
        ("max_source_bytes", limits.max_source_bytes() == 0),
        ("max_collection_len", limits.max_collection_len() == 0),
        ("max_value_depth", limits.max_value_depth() == 0),
        ("max_expression_depth", limits.max_expression_depth() == 0),
    ];
    match zero.iter().find(|(_, is_zero)| *is_zero) {
        Some((name, _)) => Err(ConfigError::Validation(format!(
            "`limits.{name}` must be greater than zero"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_explicit_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[limits]\ntimeout_ms = 500\nmax_call_depth = 16\n\n[output]\npretty = true\n",
        )
        .expect("write config");

        let config = load_config(Some(&path)).expect("valid config");
        assert_eq!(config.limits().timeout(), Duration::from_millis(500));
        assert_eq!(config.limits().max_call_depth(), 16);
        assert_eq!(config.limits().max_collection_len(), 100_000);
        assert!(config.output().pretty());
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempdir().expect("temp dir");
        let err = load_config(Some(dir.path().join("absent.toml"))).expect_err("missing");
        assert!(matches!(&err, PadforgeError::Config(message) if message.contains("absent.toml")));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[limits\ntimeout_ms = 1").expect("write config");
        let err = load_config(Some(&path)).expect_err("invalid");
        assert!(err.to_string().contains("Failed to parse TOML configuration"));
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[limits]\nmax_call_depth = 0\n").expect("write config");
        let err = load_config(Some(&path)).expect_err("zero depth");
        assert_eq!(
            err.to_string(),
            "Configuration error: Validation error: `limits.max_call_depth` must be greater than zero"
        );
    }

    #[test]
    fn test_zero_size_limits_are_rejected() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        for name in ["max_collection_len", "max_value_depth", "max_expression_depth"] {
            fs::write(&path, format!("[limits]\n{name} = 0\n")).expect("write config");
            let err = load_config(Some(&path)).expect_err("zero limit");
            assert!(
                err.to_string().contains(&format!("`limits.{name}` must be greater than zero")),
                "{err}"
            );
        }
    }
}
