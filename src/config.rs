//! Configuration management for Nomiko using the prefer crate.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalyzerSettings, DEFAULT_JURISDICTION};
use crate::llm::LlmConfig;
use crate::store::{FileSlotStore, RecentDocuments, SlotStore, SqliteSlotStore, StoreError};

/// Default database filename for the SQLite store.
pub const DEFAULT_DATABASE_FILENAME: &str = "nomiko.db";

/// Default server bind address.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3030;

/// Where the recent-documents collection is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// One JSON file per slot in the data directory.
    #[default]
    File,
    /// A `slots` table in a SQLite database in the data directory.
    Sqlite,
}

impl prefer::FromValue for StoreBackend {
    fn from_value(value: &prefer::ConfigValue) -> prefer::Result<Self> {
        match value.as_str() {
            Some("file") => Ok(StoreBackend::File),
            Some("sqlite") => Ok(StoreBackend::Sqlite),
            Some(other) => Err(prefer::Error::ConversionError {
                key: String::new(),
                type_name: "StoreBackend".to_string(),
                source: format!("unknown store backend: {}", other).into(),
            }),
            None => Err(prefer::Error::ConversionError {
                key: String::new(),
                type_name: "StoreBackend".to_string(),
                source: "expected string".into(),
            }),
        }
    }
}

fn is_store_default(store: &StoreBackend) -> bool {
    *store == StoreBackend::default()
}

/// Analysis configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, prefer::FromValue)]
pub struct AnalysisConfig {
    /// Legal system fairness benchmarks compare against (default: India).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
}

impl AnalysisConfig {
    pub fn is_default(&self) -> bool {
        self.jurisdiction.is_none()
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, prefer::FromValue)]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl ServerConfig {
    pub fn is_default(&self) -> bool {
        self.host.is_none() && self.port.is_none()
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, prefer::FromValue)]
pub struct Config {
    /// Data directory path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Store backend for recent documents.
    #[serde(default, skip_serializing_if = "is_store_default")]
    #[prefer(default)]
    pub store: StoreBackend,
    /// Database filename (SQLite store only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// LLM configuration.
    #[serde(default, skip_serializing_if = "LlmConfig::is_default")]
    #[prefer(default)]
    pub llm: LlmConfig,
    /// Analysis configuration.
    #[serde(default, skip_serializing_if = "AnalysisConfig::is_default")]
    #[prefer(default)]
    pub analysis: AnalysisConfig,
    /// HTTP server configuration.
    #[serde(default, skip_serializing_if = "ServerConfig::is_default")]
    #[prefer(default)]
    pub server: ServerConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    #[prefer(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Automatically discovers nomiko config files in standard locations.
    pub async fn load() -> Self {
        // Use prefer for file discovery, then parse with serde
        match prefer::load("nomiko").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => Self::load_from_path(path).await.unwrap_or_else(|e| {
                    tracing::warn!("{}", e);
                    Self::default()
                }),
                None => Self::default(),
            },
            // No config file found, use defaults (LLM device settings come from env)
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e))?,
            _ => serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e))?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Get the base directory for resolving relative paths.
    /// Returns the config file's parent directory if available, otherwise None.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved relative to `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref data_dir) = self.data_dir {
            settings.data_dir = self.resolve_path(data_dir, base_dir);
        }
        settings.store = self.store;
        if let Some(ref database) = self.database {
            settings.database_filename = database.clone();
        }
        if let Some(ref host) = self.server.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.server.port {
            settings.port = port;
        }
    }

    /// Settings for the analysis operations.
    pub fn analyzer_settings(&self) -> AnalyzerSettings {
        AnalyzerSettings {
            max_content_chars: self.llm.max_content_chars(),
            jurisdiction: self
                .analysis
                .jurisdiction
                .clone()
                .filter(|j| !j.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_JURISDICTION.to_string()),
        }
    }
}

/// Runtime settings resolved from config file, flags and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Store backend.
    pub store: StoreBackend,
    /// Database filename (SQLite store only).
    pub database_filename: String,
    /// Server bind address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        // Platform data dir -> Home dir -> Current dir
        let data_dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nomiko");

        Self {
            data_dir,
            store: StoreBackend::default(),
            database_filename: DEFAULT_DATABASE_FILENAME.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Settings {
    /// Create settings with a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Default::default()
        }
    }

    /// Full path to the SQLite database.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_filename)
    }

    /// Build the slot store for the configured backend.
    pub fn slot_store(&self) -> Result<Arc<dyn SlotStore>, StoreError> {
        Ok(match self.store {
            StoreBackend::File => Arc::new(FileSlotStore::new(&self.data_dir)),
            StoreBackend::Sqlite => Arc::new(SqliteSlotStore::new(&self.database_path())?),
        })
    }

    /// Open the recent-documents store.
    pub fn open_documents(&self) -> Result<RecentDocuments, StoreError> {
        RecentDocuments::open(self.slot_store()?)
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Data directory (--data-dir flag).
    pub data_dir: Option<PathBuf>,
}

/// Look for a config file in the data directory.
fn find_config_in_data_dir(data_dir: &Path) -> Option<PathBuf> {
    let extensions = ["toml", "yaml", "yml", "json"];

    for ext in extensions {
        let path = data_dir.join(format!("nomiko.{}", ext));
        if path.exists() {
            return Some(path);
        }
    }
    None
}

/// Load config from file sources.
async fn load_file_config(options: &LoadOptions) -> Result<Config, String> {
    // Priority 1: Explicit --config flag
    if let Some(ref config_path) = options.config_path {
        return Config::load_from_path(config_path).await;
    }

    // Priority 2: Config in the data dir
    if let Some(ref data_dir) = options.data_dir {
        if let Some(config_path) = find_config_in_data_dir(data_dir) {
            tracing::debug!("Found config in data dir: {}", config_path.display());
            return Config::load_from_path(&config_path).await;
        }
    }

    // Priority 3: Auto-discover via prefer
    Ok(Config::load().await)
}

/// Load settings with explicit options.
/// Returns (Settings, Config) tuple.
///
/// An explicit `--config` file that cannot be read or parsed is an error;
/// a broken auto-discovered file falls back to defaults.
pub async fn load_settings_with_options(
    options: LoadOptions,
) -> Result<(Settings, Config), String> {
    let config = load_file_config(&options).await?;
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let mut settings = Settings::default();
    let base_dir = config.base_dir().unwrap_or_else(|| cwd.clone());
    config.apply_to_settings(&mut settings, &base_dir);

    // --data-dir takes precedence over the config file
    if let Some(data_dir) = options.data_dir {
        settings.data_dir = config.resolve_path(&data_dir.to_string_lossy(), &cwd);
    }

    Ok((settings, config))
}
