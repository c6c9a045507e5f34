use crate::controller::ControllerOptions;
use crate::error::{FsNavError, Result};
use crate::navigation::DEFAULT_HOME_LABEL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_BASE_URL: &str = "FSNAV_BASE_URL";
pub const ENV_TOKEN: &str = "FSNAV_TOKEN";
pub const ENV_PAGE_SIZE: &str = "FSNAV_PAGE_SIZE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub paging: PagingConfig,
    pub navigation: NavigationConfig,
    pub keybindings: KeybindingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub cache_subtrees: bool,
    pub home_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: char,
    pub search: char,
    pub home: char,
    pub reload: char,
    pub next_page: char,
    pub previous_page: char,
    pub larger_page: char,
    pub smaller_page: char,
    pub open_crumb: char,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout_secs: 10,
            token: None,
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: 5,
            page_size_options: vec![5, 10, 25],
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            cache_subtrees: false,
            home_label: DEFAULT_HOME_LABEL.to_string(),
        }
    }
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: 'q',
            search: '/',
            home: 'h',
            reload: 'r',
            next_page: 'n',
            previous_page: 'p',
            larger_page: '+',
            smaller_page: '-',
            open_crumb: 'b',
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Defaults, then the config file, then `FSNAV_*` environment
    /// variables. An explicit `path` must exist; the default location is
    /// optional. Not validated yet: command-line flags may still correct
    /// it, so callers run [`Config::validate`] once everything is applied.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::default_path() {
                Some(default) if default.exists() => Self::load_from_file(&default)?,
                _ => Self::default(),
            },
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FsNavError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            FsNavError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        log::info!("⚙️ config: loaded {}", path.display());
        Ok(config)
    }

    /// `$XDG_CONFIG_HOME/fsnav/config.json`, falling back to
    /// `$HOME/.config/fsnav/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
        Some(base.join("fsnav").join("config.json"))
    }

    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            self.server.base_url = base_url;
        }
        if let Ok(token) = std::env::var(ENV_TOKEN) {
            self.server.token = Some(token);
        }
        if let Ok(page_size) = std::env::var(ENV_PAGE_SIZE) {
            self.paging.page_size = page_size.trim().parse().map_err(|_| {
                FsNavError::Config(format!("{} is not a number: {}", ENV_PAGE_SIZE, page_size))
            })?;
        }
        Ok(())
    }

    /// Command-line flags win over everything else.
    pub fn apply_overrides(
        &mut self,
        base_url: Option<String>,
        token: Option<String>,
        page_size: Option<usize>,
    ) {
        if let Some(base_url) = base_url {
            self.server.base_url = base_url;
        }
        if let Some(token) = token {
            self.server.token = Some(token);
        }
        if let Some(page_size) = page_size {
            self.paging.page_size = page_size;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.paging.page_size == 0 {
            return Err(FsNavError::Config("page_size must be greater than zero".to_string()));
        }
        if self.paging.page_size_options.is_empty()
            || self.paging.page_size_options.contains(&0)
        {
            return Err(FsNavError::Config(
                "page_size_options must be non-empty and positive".to_string(),
            ));
        }
        if !self.paging.page_size_options.contains(&self.paging.page_size) {
            return Err(FsNavError::Config(format!(
                "page_size {} is not one of {:?}",
                self.paging.page_size, self.paging.page_size_options
            )));
        }
        if self.navigation.home_label.trim().is_empty() {
            return Err(FsNavError::Config("home_label must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            home_label: self.navigation.home_label.clone(),
            page_size: self.paging.page_size,
            cache_subtrees: self.navigation.cache_subtrees,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var(ENV_BASE_URL);
        std::env::remove_var(ENV_TOKEN);
        std::env::remove_var(ENV_PAGE_SIZE);
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.paging.page_size, 5);
        assert_eq!(config.paging.page_size_options, vec![5, 10, 25]);
        assert_eq!(config.navigation.home_label, "home");
        assert_eq!(config.keybindings.quit, 'q');
    }

    #[test]
    #[serial]
    fn test_partial_file_keeps_defaults() {
        clear_env();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "server": { "base_url": "http://files.internal/api" },
                 "navigation": { "cache_subtrees": true } }"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.server.base_url, "http://files.internal/api");
        assert_eq!(config.server.timeout_secs, 10);
        assert!(config.navigation.cache_subtrees);
        assert_eq!(config.paging.page_size, 5);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        clear_env();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "paging": { "page_size": 10 } }"#).unwrap();

        std::env::set_var(ENV_PAGE_SIZE, "25");
        std::env::set_var(ENV_TOKEN, "env-token");
        let config = Config::load(Some(&path));
        clear_env();

        let config = config.unwrap();
        assert_eq!(config.paging.page_size, 25);
        assert_eq!(config.server.token.as_deref(), Some("env-token"));
    }

    #[test]
    #[serial]
    fn test_bad_env_page_size() {
        clear_env();
        std::env::set_var(ENV_PAGE_SIZE, "lots");
        let result = Config::default().apply_env();
        clear_env();

        assert_matches!(result, Err(FsNavError::Config(_)));
    }

    #[test]
    #[serial]
    fn test_missing_explicit_file_is_an_error() {
        clear_env();
        let dir = tempfile::TempDir::new().unwrap();
        let result = Config::load(Some(&dir.path().join("absent.json")));
        assert_matches!(result, Err(FsNavError::Config(_)));
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.paging.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.paging.page_size = 7;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.paging.page_size_options.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.apply_overrides(None, Some("t".to_string()), Some(10));
        assert!(config.validate().is_ok());
        assert_eq!(config.paging.page_size, 10);
        config.apply_overrides(None, None, Some(3));
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_flag_corrects_invalid_file_value() {
        clear_env();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "paging": { "page_size": 3 } }"#).unwrap();

        let mut config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.paging.page_size, 3);
        assert!(config.validate().is_err());

        config.apply_overrides(None, None, Some(5));
        assert!(config.validate().is_ok());
        assert_eq!(config.paging.page_size, 5);
    }

    #[test]
    fn test_token_is_never_written_back() {
        let mut config = Config::default();
        config.server.token = Some("secret".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
