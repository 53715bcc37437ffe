//! Configuration loader.

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        config.validate()?;
        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.pulsehook`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.trigger.cadence_secs, 60);
    }

    #[test]
    fn test_load_basic_config() {
        let content = r#"
            [store]
            path = "/var/lib/pulsehook/jobs.db"

            [trigger]
            cadence_secs = 30
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(
            config.store.path,
            std::path::PathBuf::from("/var/lib/pulsehook/jobs.db")
        );
        assert_eq!(config.trigger.cadence_secs, 30);
        // Untouched sections keep their defaults.
        assert_eq!(config.dispatch.request_timeout_secs, 30);
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            [store]
            path = "jobs.db"
            connect_timeout_secs = 5
            fetch_timeout_secs = 5

            [trigger]
            cadence_secs = 10
            max_concurrent_dispatches = 2

            [dispatch]
            request_timeout_secs = 15
            user_agent = "custom/1.0"

            [log]
            dir = "/var/log/pulsehook"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.store.connect_timeout_secs, 5);
        assert_eq!(config.trigger.max_concurrent_dispatches, 2);
        assert_eq!(config.dispatch.user_agent, "custom/1.0");
        assert!(config.log.dir.is_some());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[trigger]").unwrap();
        writeln!(file, "cadence_secs = 120").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.trigger.cadence_secs, 120);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml() {
        let content = "invalid = [unclosed";
        let result = ConfigLoader::load_str(content);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let content = r#"
            [trigger]
            cadence_secs = 0
        "#;
        assert!(matches!(
            ConfigLoader::load_str(content),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("PULSEHOOK_TEST_VAR", "/data/jobs.db");
        }
        let content = "[store]\npath = \"${PULSEHOOK_TEST_VAR}\"";
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.store.path, std::path::PathBuf::from("/data/jobs.db"));
        unsafe {
            std::env::remove_var("PULSEHOOK_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "[store]\npath = \"${NONEXISTENT_PULSEHOOK_VAR_12345}\"";
        let result = ConfigLoader::load_str(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_path() {
        let expanded = ConfigLoader::expand_path("~/.pulsehook");
        assert!(!expanded.starts_with('~'));

        let plain = "/usr/local/share";
        assert_eq!(ConfigLoader::expand_path(plain), plain);
    }
}
