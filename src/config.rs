use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::auth::EnvCredentials;
use crate::models::{DevOpsSystem, ObservedItem};

const CONFIG_STEM: &str = "devops-observer";

/// Configuration file structure.
///
/// Describes the systems to poll and the credentials used for them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Polling behavior
    #[serde(default)]
    pub settings: Settings,

    /// CI systems, polled in order
    #[serde(default)]
    pub systems: Vec<DevOpsSystem>,

    /// Flat credential map keyed `"{guid}:LoginName"` / `"{guid}:Password"`
    #[serde(default)]
    pub credentials: IndexMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Requests in flight per system (1 polls sequentially)
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Per-request timeout enforced by the HTTP client
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_concurrent_requests: default_max_concurrent_requests(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_max_concurrent_requests() -> usize {
    1
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("{CONFIG_STEM}/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./devops-observer.toml
    /// 3. ./devops-observer.json
    /// 4. ./devops-observer.yaml
    /// 5. ./devops-observer.yml
    /// 6. `<config dir>/devops-observer/config.toml`
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        for candidate in Self::candidates() {
            if candidate.exists() {
                return Self::load_from_path(&candidate);
            }
        }

        Ok(Self::default())
    }

    fn candidates() -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = ["toml", "json", "yaml", "yml"]
            .iter()
            .map(|ext| PathBuf::from(format!("{CONFIG_STEM}.{ext}")))
            .collect();

        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join(CONFIG_STEM).join("config.toml"));
        }

        candidates
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("yaml") | Some("yml") => serde_yaml::to_string(self)?,
            _ => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Credentials from the environment, falling back to the file.
    pub fn credential_store(&self) -> (EnvCredentials, IndexMap<String, String>) {
        self.credential_store_with(EnvCredentials::default())
    }

    fn credential_store_with(
        &self,
        env: EnvCredentials,
    ) -> (EnvCredentials, IndexMap<String, String>) {
        (env, self.credentials.clone())
    }

    /// Systems to poll, optionally narrowed to one identifier.
    pub fn select_systems(&self, guid: Option<&str>) -> Result<Vec<&DevOpsSystem>> {
        match guid {
            None => Ok(self.systems.iter().collect()),
            Some(guid) => {
                let system = self
                    .systems
                    .iter()
                    .find(|s| s.guid == guid)
                    .with_context(|| format!("No system configured with guid '{guid}'"))?;
                Ok(vec![system])
            }
        }
    }

    /// Starter configuration written by `init`.
    pub fn sample() -> Self {
        let guid = "3f6b2c1e-8a4d-4c2b-9f1e-7d5a0b9c2e11".to_string();

        let mut credentials = IndexMap::new();
        credentials.insert(format!("{guid}:LoginName"), "your-bitbucket-user".to_string());
        credentials.insert(format!("{guid}:Password"), "your-app-password".to_string());

        Self {
            settings: Settings::default(),
            systems: vec![DevOpsSystem {
                guid,
                name: Some("Bitbucket Cloud".to_string()),
                server_url: "https://api.bitbucket.org".to_string(),
                tenant: "your-workspace".to_string(),
                observed_automations: vec![ObservedItem {
                    repository_name: "your-repository".to_string(),
                    repository_branch: "main".to_string(),
                    alias: "My service".to_string(),
                }],
            }],
            credentials,
        }
    }
}
