use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, Result};
use serde::Deserialize;

use calltree_core::{TreeBuilder, DEFAULT_MAX_ARRAY_LENGTH};

use crate::server::DEFAULT_MAX_SESSIONS;

const CALLTREE_CONFIG: &str = "calltree.toml";

/// calltree configuration file structure (calltree.toml)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalltreeConfig {
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub export: ExportConfig,
}

/// How fresh parameter trees are built
#[derive(Debug, Clone, Deserialize)]
pub struct FormConfig {
    /// Element count of a dynamic array in a freshly built tree
    #[serde(default = "default_dynamic_length")]
    pub default_dynamic_length: usize,
    /// Largest element count an array may be declared with or resized to
    #[serde(default = "default_max_array_length")]
    pub max_array_length: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            default_dynamic_length: default_dynamic_length(),
            max_array_length: default_max_array_length(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_sessions: default_max_sessions(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

fn default_dynamic_length() -> usize {
    1
}

fn default_max_array_length() -> usize {
    DEFAULT_MAX_ARRAY_LENGTH
}

fn default_max_sessions() -> usize {
    DEFAULT_MAX_SESSIONS
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_export_dir() -> String {
    "exports".to_string()
}

impl CalltreeConfig {
    /// Load configuration from an explicit path, or from calltree.toml in the
    /// current directory when it exists. Without either, defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None if Path::new(CALLTREE_CONFIG).exists() => {
                Self::load_from(Path::new(CALLTREE_CONFIG))
            }
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre!("Could not read {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    /// Parse configuration text, resolving `${VAR}` references
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: CalltreeConfig = toml::from_str(content)?;
        config.server.host = resolve_env_var(&config.server.host)?;
        config.export.dir = resolve_env_var(&config.export.dir)?;
        Ok(config)
    }

    pub fn tree_builder(&self) -> TreeBuilder {
        TreeBuilder::new()
            .with_default_dynamic_length(self.form.default_dynamic_length)
            .with_max_array_length(self.form.max_array_length)
    }

    pub fn export_dir(&self) -> PathBuf {
        PathBuf::from(&self.export.dir)
    }
}

/// Resolve environment variable references in a string
/// Supports ${VAR_NAME} syntax
fn resolve_env_var(value: &str) -> Result<String> {
    match value.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
        Some(var_name) => std::env::var(var_name)
            .map_err(|_| eyre!("Environment variable '{}' not set", var_name)),
        None => Ok(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[form]
default_dynamic_length = 3
max_array_length = 64

[server]
host = "0.0.0.0"
port = 8080
max_sessions = 16

[export]
dir = "out/args"
"#;

        let config = CalltreeConfig::parse(toml_content).unwrap();

        assert_eq!(config.form.default_dynamic_length, 3);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.export_dir(), PathBuf::from("out/args"));
        assert_eq!(config.server.max_sessions, 16);
        assert_eq!(config.tree_builder().default_dynamic_length(), 3);
        assert_eq!(config.tree_builder().max_array_length(), 64);
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = CalltreeConfig::parse("").unwrap();

        assert_eq!(config.form.default_dynamic_length, 1);
        assert_eq!(config.form.max_array_length, 1024);
        assert_eq!(config.server.max_sessions, 256);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.export.dir, "exports");
    }

    #[test]
    fn test_partial_section() {
        let config = CalltreeConfig::parse("[server]\nport = 4000\n").unwrap();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_env_var_in_export_dir() {
        std::env::set_var("CALLTREE_TEST_EXPORT_DIR", "/tmp/calltree-exports");

        let config = CalltreeConfig::parse(
            r#"
[export]
dir = "${CALLTREE_TEST_EXPORT_DIR}"
"#,
        )
        .unwrap();
        assert_eq!(config.export.dir, "/tmp/calltree-exports");

        std::env::remove_var("CALLTREE_TEST_EXPORT_DIR");
    }

    #[test]
    fn test_resolve_env_var_literal() {
        let result = resolve_env_var("exports").unwrap();
        assert_eq!(result, "exports");
    }

    #[test]
    fn test_resolve_env_var_missing() {
        let result = resolve_env_var("${NONEXISTENT_VAR_99999}");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calltree.toml");
        std::fs::write(&path, "[form]\ndefault_dynamic_length = 0\n").unwrap();

        let config = CalltreeConfig::load(Some(&path)).unwrap();
        assert_eq!(config.form.default_dynamic_length, 0);

        assert!(CalltreeConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
