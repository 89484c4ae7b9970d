use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::changelog::Author;
use crate::version::registries::github::DEFAULT_BASE_URL;
use crate::version::types::Version;

// =============================================================================
// Time-related constants
// =============================================================================

/// Default cache time-to-live in milliseconds (24 hours)
pub const DEFAULT_CACHE_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Timeout for fetch operations in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

// =============================================================================
// Paths
// =============================================================================

/// Configuration file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "docs-versioning.json";

/// Cache directory, relative to the site root
pub const DEFAULT_CACHE_DIR: &str = ".cache/docs-versioning";

/// Environment variable consulted when `github.token` is not configured
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DocsConfig {
    /// Site root; relative paths below resolve against it
    pub root_dir: PathBuf,
    pub docs_versioning: DocsVersioningConfig,
    pub cache: CacheConfig,
    pub github: GithubConfig,
    pub content: ContentConfig,
    pub changelog_dir: PathBuf,
    /// Known changelog authors keyed by username
    pub authors: IndexMap<String, Author>,
    /// Author credited on changelog entries that name nobody; defaults to the
    /// GitHub owner
    pub default_author: Option<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            docs_versioning: DocsVersioningConfig::default(),
            cache: CacheConfig::default(),
            github: GithubConfig::default(),
            content: ContentConfig::default(),
            changelog_dir: PathBuf::from("changelog"),
            authors: IndexMap::new(),
            default_author: None,
        }
    }
}

/// Versioning switch and version source
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DocsVersioningConfig {
    pub enable: bool,
    pub versions: VersionsSource,
}

/// Where versions come from. A non-empty static list wins over GitHub.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct VersionsSource {
    #[serde(rename = "static")]
    pub static_versions: Option<Vec<Version>>,
    pub github: Option<GithubSource>,
}

/// A GitHub repository, given either as `{"owner", "repo"}` or as an
/// `"owner/repo"` package name
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(try_from = "GithubSourceRecord")]
pub struct GithubSource {
    pub owner: String,
    pub repo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Package name must have the form \"owner/repo\": {0:?}")]
pub struct InvalidPackageName(pub String);

impl GithubSource {
    /// Split an `owner/repo` package name at its first slash
    pub fn from_package_name(package_name: &str) -> Result<Self, InvalidPackageName> {
        let package_name = package_name.trim();
        match package_name.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => Ok(Self {
                owner: owner.to_string(),
                repo: repo.to_string(),
            }),
            _ => Err(InvalidPackageName(package_name.to_string())),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GithubSourceRecord {
    PackageName(String),
    Parts { owner: String, repo: String },
}

impl TryFrom<GithubSourceRecord> for GithubSource {
    type Error = InvalidPackageName;

    fn try_from(record: GithubSourceRecord) -> Result<Self, Self::Error> {
        match record {
            GithubSourceRecord::PackageName(name) => Self::from_package_name(&name),
            GithubSourceRecord::Parts { owner, repo } => Ok(Self { owner, repo }),
        }
    }
}

/// Cache-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache directory; defaults to [`DEFAULT_CACHE_DIR`] under the root
    pub dir: Option<PathBuf>,
    /// Time-to-live in milliseconds
    pub ttl: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            ttl: DEFAULT_CACHE_TTL_MS,
        }
    }
}

/// GitHub API access
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GithubConfig {
    pub base_url: String,
    pub token: Option<String>,
    /// Request timeout in milliseconds
    pub timeout: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout: FETCH_TIMEOUT_MS,
        }
    }
}

impl GithubConfig {
    /// Configured token, or `$GITHUB_TOKEN`
    pub fn token(&self) -> Option<String> {
        self.token_with_env(std::env::var(GITHUB_TOKEN_ENV).ok())
    }

    fn token_with_env(&self, env_token: Option<String>) -> Option<String> {
        self.token
            .clone()
            .or(env_token)
            .filter(|token| !token.is_empty())
    }
}

/// Content collection sources
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentConfig {
    /// Directory of the current docs, relative to the root
    pub dir: PathBuf,
    pub include: String,
    pub exclude: Vec<String>,
    /// Glob inside a historical release tarball
    pub versioned_include: String,
    pub versioned_exclude: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("content"),
            include: "**/*.md".to_string(),
            exclude: vec!["index.md".to_string()],
            versioned_include: "docs/content/**/*".to_string(),
            versioned_exclude: vec!["docs/content/**/*.json".to_string()],
        }
    }
}

impl DocsConfig {
    /// Read and parse a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if given, otherwise [`DEFAULT_CONFIG_FILE`] when it exists,
    /// otherwise defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Resolve `path` against the root unless it is absolute
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root_dir.join(path)
        }
    }

    pub fn cache_dir(&self) -> PathBuf {
        match &self.cache.dir {
            Some(dir) => self.resolve(dir),
            None => self.root_dir.join(DEFAULT_CACHE_DIR),
        }
    }

    pub fn content_dir(&self) -> PathBuf {
        self.resolve(&self.content.dir)
    }

    pub fn changelog_dir(&self) -> PathBuf {
        self.resolve(&self.changelog_dir)
    }

    /// Configured default author, else the owner of the GitHub source
    pub fn default_author(&self) -> Option<&str> {
        self.default_author.as_deref().or_else(|| {
            self.docs_versioning
                .versions
                .github
                .as_ref()
                .map(|github| github.owner.as_str())
        })
    }
}

/// Returns the path to the data directory for docs-versioning.
/// Uses $XDG_DATA_HOME/docs-versioning if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/docs-versioning,
/// or ./docs-versioning if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("docs-versioning.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("docs-versioning")
}
