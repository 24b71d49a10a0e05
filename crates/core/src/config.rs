//! Configuration management for datagate.
//!
//! Configuration is assembled from, in increasing precedence:
//! - Built-in defaults (the reference keyword sets and source locations)
//! - The YAML config file (`.datagate/config.yaml` or `DATAGATE_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! Paths for the relational database, the document collection and the SQLite
//! cache default to files under `<workspace>/.datagate/`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::source::SourceKey;

/// Default REST Countries lookup endpoint.
pub const DEFAULT_COUNTRY_URL: &str = "https://restcountries.com/v3.1/name/";

/// Known cache store backends.
pub const CACHE_BACKENDS: [&str; 2] = ["sqlite", "memory"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .datagate/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Keyword routing rules
    pub routing: RoutingConfig,

    /// Backing store locations
    pub sources: SourcesConfig,

    /// Aggregation settings
    pub gateway: GatewayConfig,
}

/// Keyword routing rules.
///
/// Loaded once and handed to the router at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingConfig {
    /// Trigger words per source, matched in this order
    pub keywords: Vec<KeywordRule>,

    /// Two-domain override evaluated before keyword matching
    #[serde(default)]
    pub multi_source: Option<MultiSourceRule>,

    /// Source used when nothing matches
    pub fallback: SourceKey,
}

/// Trigger words that select one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub source: SourceKey,
    pub words: Vec<String>,
}

/// Queries hitting both trigger lists route to exactly `sources`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSourceRule {
    pub project_triggers: Vec<String>,
    pub people_triggers: Vec<String>,
    pub sources: [SourceKey; 2],
}

/// Backing store locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourcesConfig {
    /// SQLite database holding the `users` and `orders` tables
    pub database: Option<PathBuf>,

    /// JSON-lines project collection
    pub documents: Option<PathBuf>,

    /// Country lookup base URL
    pub country_url: String,

    /// Cache store settings
    pub cache: CacheConfig,
}

/// Cache store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheConfig {
    /// "sqlite" or "memory"
    pub backend: String,

    /// SQLite cache file (sqlite backend only)
    pub path: Option<PathBuf>,

    /// Default entry time-to-live in seconds
    pub ttl_secs: u64,

    /// Capacity of the memory backend
    pub max_entries: u64,
}

/// Aggregation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayConfig {
    /// Maximum records per adapter
    pub limit: usize,

    /// Per-adapter timeout in seconds
    pub timeout_secs: u64,

    /// Cache assembled responses
    pub cache_responses: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
    routing: Option<RoutingConfig>,
    sources: Option<SourcesConfig>,
    gateway: Option<GatewayConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            keywords: vec![
                KeywordRule {
                    source: SourceKey::RelationalUser,
                    words: words(&["user", "profile", "employee", "staff"]),
                },
                KeywordRule {
                    source: SourceKey::RelationalOrder,
                    words: words(&["order", "purchase", "amount", "transaction", "product"]),
                },
                KeywordRule {
                    source: SourceKey::DocumentProject,
                    words: words(&["project", "document", "task", "pipeline", "status"]),
                },
                KeywordRule {
                    source: SourceKey::ExternalCountry,
                    words: words(&["country", "capital", "population", "region", "city"]),
                },
                KeywordRule {
                    source: SourceKey::Cache,
                    words: words(&["status", "cache", "critical", "live"]),
                },
            ],
            multi_source: Some(MultiSourceRule {
                project_triggers: words(&["project", "pipeline"]),
                people_triggers: words(&["user", "employee", "staff"]),
                sources: [SourceKey::RelationalUser, SourceKey::DocumentProject],
            }),
            fallback: SourceKey::DocumentProject,
        }
    }
}

impl RoutingConfig {
    /// Check that every rule can actually match something.
    pub fn validate(&self) -> AppResult<()> {
        for rule in &self.keywords {
            if !has_word(&rule.words) {
                return Err(AppError::Routing(format!(
                    "Keyword rule for '{}' has no trigger words",
                    rule.source
                )));
            }
        }

        if let Some(ref multi) = self.multi_source {
            if !has_word(&multi.project_triggers) || !has_word(&multi.people_triggers) {
                return Err(AppError::Routing(
                    "Multi-source rule needs trigger words on both sides".to_string(),
                ));
            }
            if multi.sources[0] == multi.sources[1] {
                return Err(AppError::Routing(format!(
                    "Multi-source rule names '{}' twice",
                    multi.sources[0]
                )));
            }
        }

        Ok(())
    }
}

fn has_word(words: &[String]) -> bool {
    words.iter().any(|w| !w.trim().is_empty())
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            database: None,
            documents: None,
            country_url: DEFAULT_COUNTRY_URL.to_string(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            path: None,
            ttl_secs: 3600,
            max_entries: 10_000,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            limit: 3,
            timeout_secs: 10,
            cache_responses: true,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            log_level: None,
            verbose: false,
            no_color: false,
            routing: RoutingConfig::default(),
            sources: SourcesConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML file and the environment.
    ///
    /// Environment variables:
    /// - `DATAGATE_WORKSPACE`: Override workspace path
    /// - `DATAGATE_CONFIG`: Path to config file
    /// - `DATAGATE_DATABASE`: Relational SQLite database
    /// - `DATAGATE_DOCUMENTS`: Project document collection
    /// - `DATAGATE_COUNTRY_URL`: Country lookup base URL
    /// - `DATAGATE_CACHE_BACKEND`: Cache store backend
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use datagate_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("DATAGATE_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("DATAGATE_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.datagate_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(database) = std::env::var("DATAGATE_DATABASE") {
            config.sources.database = Some(PathBuf::from(database));
        }

        if let Ok(documents) = std::env::var("DATAGATE_DOCUMENTS") {
            config.sources.documents = Some(PathBuf::from(documents));
        }

        if let Ok(url) = std::env::var("DATAGATE_COUNTRY_URL") {
            config.sources.country_url = url;
        }

        if let Ok(backend) = std::env::var("DATAGATE_CACHE_BACKEND") {
            config.sources.cache.backend = backend;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into a copy of this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(routing) = config_file.routing {
            result.routing = routing;
        }

        if let Some(sources) = config_file.sources {
            result.sources = sources;
        }

        if let Some(gateway) = config_file.gateway {
            result.gateway = gateway;
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the file.
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> AppResult<Self> {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            if self.config_file.as_ref() != Some(&config_file) {
                self = self.merge_yaml(&config_file)?;
            }
            self.config_file = Some(config_file);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        Ok(self)
    }

    /// Get the path to the .datagate directory.
    pub fn datagate_dir(&self) -> PathBuf {
        self.workspace.join(".datagate")
    }

    /// Ensure the .datagate directory exists.
    pub fn ensure_datagate_dir(&self) -> AppResult<()> {
        let dir = self.datagate_dir();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| {
                AppError::Config(format!("Failed to create .datagate directory: {}", e))
            })?;
        }
        Ok(())
    }

    /// Relational database path.
    pub fn database_path(&self) -> PathBuf {
        self.resolve(self.sources.database.as_deref(), "relational.sqlite")
    }

    /// Project document collection path.
    pub fn documents_path(&self) -> PathBuf {
        self.resolve(self.sources.documents.as_deref(), "projects.jsonl")
    }

    /// SQLite cache path.
    pub fn cache_path(&self) -> PathBuf {
        self.resolve(self.sources.cache.path.as_deref(), "cache.sqlite")
    }

    fn resolve(&self, configured: Option<&Path>, default_name: &str) -> PathBuf {
        match configured {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => self.workspace.join(path),
            None => self.datagate_dir().join(default_name),
        }
    }

    /// Validate the assembled configuration.
    pub fn validate(&self) -> AppResult<()> {
        let backend = self.sources.cache.backend.as_str();
        if !CACHE_BACKENDS.contains(&backend) {
            return Err(AppError::Config(format!(
                "Unknown cache backend: {}. Supported: {}",
                backend,
                CACHE_BACKENDS.join(", ")
            )));
        }

        if self.gateway.limit == 0 {
            return Err(AppError::Config(
                "gateway.limit must be at least 1".to_string(),
            ));
        }

        if self.gateway.timeout_secs == 0 {
            return Err(AppError::Config(
                "gateway.timeoutSecs must be at least 1".to_string(),
            ));
        }

        self.routing.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.gateway.limit, 3);
        assert_eq!(config.sources.cache.ttl_secs, 3600);
        assert_eq!(config.sources.country_url, DEFAULT_COUNTRY_URL);
        assert_eq!(config.routing.fallback, SourceKey::DocumentProject);
        assert_eq!(config.routing.keywords.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_paths_live_under_datagate_dir() {
        let mut config = AppConfig::default();
        config.workspace = PathBuf::from("/srv/gate");

        assert_eq!(
            config.database_path(),
            PathBuf::from("/srv/gate/.datagate/relational.sqlite")
        );
        assert_eq!(
            config.documents_path(),
            PathBuf::from("/srv/gate/.datagate/projects.jsonl")
        );

        config.sources.documents = Some(PathBuf::from("data/projects.jsonl"));
        assert_eq!(
            config.documents_path(),
            PathBuf::from("/srv/gate/data/projects.jsonl")
        );
    }

    #[test]
    fn test_merge_yaml_partial_sections() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
logging:
  level: warn
  color: false
sources:
  database: /var/lib/gate/app.sqlite
  cache:
    backend: memory
gateway:
  timeoutSecs: 2
routing:
  keywords:
    - source: external-country
      words: [nation]
  fallback: relational-order
"#,
        )
        .unwrap();

        let merged = AppConfig::default().merge_yaml(&path).unwrap();

        assert_eq!(merged.log_level.as_deref(), Some("warn"));
        assert!(merged.no_color);
        assert_eq!(
            merged.sources.database,
            Some(PathBuf::from("/var/lib/gate/app.sqlite"))
        );
        assert_eq!(merged.sources.cache.backend, "memory");
        assert_eq!(merged.sources.cache.ttl_secs, 3600);
        assert_eq!(merged.sources.country_url, DEFAULT_COUNTRY_URL);
        assert_eq!(merged.gateway.timeout_secs, 2);
        assert_eq!(merged.gateway.limit, 3);
        assert_eq!(merged.routing.keywords.len(), 1);
        assert!(merged.routing.multi_source.is_none());
        assert_eq!(merged.routing.fallback, SourceKey::RelationalOrder);
    }

    #[test]
    fn test_merge_yaml_rejects_bad_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "gateway: [not, a, map]").unwrap();

        let result = AppConfig::default().merge_yaml(&path);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_with_overrides() {
        let overridden = AppConfig::default()
            .with_overrides(Some(PathBuf::from("/tmp")), None, None, true, true)
            .unwrap();

        assert_eq!(overridden.workspace, PathBuf::from("/tmp"));
        assert!(overridden.verbose);
        assert!(overridden.no_color);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_validate_unknown_cache_backend() {
        let mut config = AppConfig::default();
        config.sources.cache.backend = "redis".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_limit() {
        let mut config = AppConfig::default();
        config.gateway.limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_routing_rejects_blank_keywords() {
        let mut routing = RoutingConfig::default();
        routing.keywords[0].words = vec!["  ".to_string()];
        assert!(matches!(routing.validate(), Err(AppError::Routing(_))));
    }

    #[test]
    fn test_routing_rejects_duplicate_pair() {
        let mut routing = RoutingConfig::default();
        if let Some(ref mut multi) = routing.multi_source {
            multi.sources = [SourceKey::Cache, SourceKey::Cache];
        }
        assert!(routing.validate().is_err());
    }
}
