//! Configuration loading and discovery for `curtain.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::{CurtainConfig, ShowKind};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for by [`find_config`].
pub const CONFIG_FILE: &str = "curtain.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse curtain.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override output path
    pub output: Option<PathBuf>,
    /// Override panel count
    pub panels: Option<u32>,
    /// Override show kind
    pub kind: Option<ShowKind>,
    /// Override random seed
    pub seed: Option<u64>,
    /// Override number of accepted files
    pub count: Option<u32>,
    /// Override complexity bounds
    pub complexity: Option<[u64; 2]>,
}

/// Find curtain.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    let cwd = env::current_dir().ok()?;
    find_config_from(cwd)
}

/// Find curtain.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a curtain.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
///
/// # Example
/// ```ignore
/// let config = load_config(Some(Path::new("shows/winter/curtain.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<CurtainConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(CurtainConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<CurtainConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: CurtainConfig = toml::from_str(&contents)?;
    check_config(&config)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Turn validation problems into a [`ConfigError::Validation`].
pub fn check_config(config: &CurtainConfig) -> Result<(), ConfigError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(())
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut CurtainConfig, overrides: &CliOverrides) {
    if let Some(ref output) = overrides.output {
        config.export.output = output.clone();
    }
    if let Some(panels) = overrides.panels {
        config.scene.panels = panels;
    }
    if let Some(kind) = overrides.kind {
        config.show.kind = kind;
    }
    if let Some(seed) = overrides.seed {
        config.show.seed = Some(seed);
    }
    if let Some(count) = overrides.count {
        config.show.count = count;
        // keep the attempt budget meaningful
        config.show.max_attempts = config.show.max_attempts.max(count);
    }
    if let Some(bounds) = overrides.complexity {
        config.export.complexity = Some(bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let config_path = dir.join(CONFIG_FILE);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(body.as_bytes())
            .expect("should write config content");
        config_path
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[scene]\npanels = 2");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[scene]\npanels = 2");

        let subdir = temp.path().join("shows").join("winter");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_load_config_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let path = write_config(
            temp.path(),
            "[scene]\npanels = 2\n\n[show]\nkind = \"lovework\"\nseed = 7\n",
        );

        let config = load_config(Some(&path)).expect("should load config");
        assert_eq!(config.scene.panels, 2);
        assert_eq!(config.show.kind, ShowKind::Lovework);
        assert_eq!(config.show.seed, Some(7));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let path = write_config(temp.path(), "[scene\npanels = ");

        let result = load_config(Some(&path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let path = write_config(temp.path(), "[scene]\npanels = 0\n[show]\ncount = 0\n");

        let result = load_config(Some(&path));
        match result {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.contains("scene.panels")));
                assert!(errors.iter().any(|e| e.contains("show.count")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_config_missing_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let result = load_config(Some(&temp.path().join(CONFIG_FILE)));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = CurtainConfig::default();
        let overrides = CliOverrides {
            output: Some(PathBuf::from("dist/show.gif")),
            panels: Some(4),
            kind: Some(ShowKind::Ambient),
            seed: Some(99),
            count: Some(80),
            complexity: Some([100, 200]),
        };

        merge_cli_overrides(&mut config, &overrides);

        assert_eq!(config.export.output, PathBuf::from("dist/show.gif"));
        assert_eq!(config.scene.panels, 4);
        assert_eq!(config.show.kind, ShowKind::Ambient);
        assert_eq!(config.show.seed, Some(99));
        assert_eq!(config.show.count, 80);
        assert_eq!(config.show.max_attempts, 80);
        assert_eq!(config.export.complexity, Some([100, 200]));
        assert!(check_config(&config).is_ok());
    }

    #[test]
    fn test_merge_empty_overrides_is_noop() {
        let mut config = CurtainConfig::default();
        merge_cli_overrides(&mut config, &CliOverrides::default());
        assert_eq!(config, CurtainConfig::default());
    }
}
