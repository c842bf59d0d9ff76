use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Where the generated client reads the auth token from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenStorage {
    LocalStorage,
    SessionStorage,
}

/// Flavor of generated data-fetching hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HooksMode {
    None,
    React,
    ReactQuery,
}

/// One package to generate bindings for
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PackageConfig {
    /// Go package directory
    #[serde(default)]
    pub path: String,

    /// File the rendered output is written to
    #[serde(default)]
    pub output_path: String,

    /// Go type name to TypeScript type text, e.g. `null.String: "null | string"`
    #[serde(default)]
    pub type_mappings: HashMap<String, String>,
}

/// Contents of `go2type.yaml`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Go2TypeConfig {
    /// Storage key holding the auth token; empty disables auth headers
    #[serde(default)]
    pub auth_token: String,

    /// `localStorage` or `sessionStorage`
    #[serde(default = "default_auth_token_storage")]
    pub auth_token_storage: String,

    /// `"true"`, `"react-query"` or `"false"`
    #[serde(default = "default_hooks")]
    pub hooks: String,

    #[serde(default)]
    pub use_date_object: bool,

    #[serde(default)]
    pub packages: Vec<PackageConfig>,
}

fn default_auth_token_storage() -> String {
    "localStorage".to_string()
}

fn default_hooks() -> String {
    "false".to_string()
}

pub const DEFAULT_CONFIG_FILE: &str = "go2type.yaml";

impl Default for Go2TypeConfig {
    fn default() -> Self {
        Self {
            auth_token: String::new(),
            auth_token_storage: default_auth_token_storage(),
            hooks: default_hooks(),
            use_date_object: false,
            packages: Vec::new(),
        }
    }
}

impl Go2TypeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse YAML without touching the filesystem
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file; relative package paths resolve against its directory
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.resolve_paths(base);
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.packages.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "at least one package must be configured".to_string(),
            ));
        }

        for (index, package) in self.packages.iter().enumerate() {
            if package.path.trim().is_empty() {
                return Err(ConfigError::InvalidConfig(format!(
                    "package #{} has no path",
                    index + 1
                )));
            }
            if package.output_path.trim().is_empty() {
                return Err(ConfigError::InvalidConfig(format!(
                    "package {} has no output_path",
                    package.path
                )));
            }
        }

        Ok(())
    }

    /// Rebase relative `path` and `output_path` entries onto `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        for package in &mut self.packages {
            package.path = rebase(base, &package.path);
            package.output_path = rebase(base, &package.output_path);
        }
    }

    /// Anything other than `sessionStorage` means `localStorage`
    pub fn token_storage(&self) -> TokenStorage {
        match self.auth_token_storage.as_str() {
            "sessionStorage" => TokenStorage::SessionStorage,
            _ => TokenStorage::LocalStorage,
        }
    }

    pub fn hooks_mode(&self) -> HooksMode {
        match self.hooks.as_str() {
            "true" => HooksMode::React,
            "react-query" => HooksMode::ReactQuery,
            _ => HooksMode::None,
        }
    }
}

fn rebase(base: &Path, path: &str) -> String {
    let candidate = PathBuf::from(path);
    if candidate.is_absolute() || base.as_os_str().is_empty() {
        path.to_string()
    } else {
        base.join(candidate).to_string_lossy().to_string()
    }
}
