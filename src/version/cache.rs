//! File-backed cache of resolved versions
//!
//! One JSON file per `(owner, repo)` pair holding `{data, timestamp}`.
//! Entries older than the configured TTL are treated as missing. Every failure
//! is reported as a miss on read and logged and skipped on write, so the cache
//! can never fail a fetch.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::version::error::CacheError;
use crate::version::types::Version;

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    data: T,
    /// Milliseconds since UNIX epoch at write time
    timestamp: i64,
}

#[derive(Debug, Clone)]
pub struct VersionCache {
    dir: PathBuf,
    ttl_ms: i64,
}

impl VersionCache {
    pub fn new(dir: impl Into<PathBuf>, ttl_ms: i64) -> Self {
        Self {
            dir: dir.into(),
            ttl_ms,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    /// Get current timestamp in milliseconds since UNIX epoch
    fn current_timestamp_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// Location of the cache file for a repository
    pub fn path(&self, owner: &str, repo: &str) -> PathBuf {
        self.dir.join(format!(
            "github-{}-{}.json",
            sanitize_file_component(owner),
            sanitize_file_component(repo)
        ))
    }

    /// Cached versions for a repository, or `None` when absent, unreadable or expired
    pub async fn get(&self, owner: &str, repo: &str) -> Option<Vec<Version>> {
        let path = self.path(owner, repo);

        let entry = match Self::read_entry(&path).await {
            Ok(entry) => entry,
            Err(CacheError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                debug!("No cache file at {:?}", path);
                return None;
            }
            Err(e) => {
                warn!("Ignoring unreadable cache file {:?}: {}", path, e);
                return None;
            }
        };

        let age = Self::current_timestamp_ms() - entry.timestamp;
        if age > self.ttl_ms {
            debug!(
                "Cache for {}/{} expired ({} ms old, ttl {} ms)",
                owner, repo, age, self.ttl_ms
            );
            return None;
        }

        debug!(
            "Cache hit for {}/{}: {} versions",
            owner,
            repo,
            entry.data.len()
        );
        Some(entry.data)
    }

    /// Store versions for a repository. Failures are logged, never returned.
    pub async fn set(&self, owner: &str, repo: &str, versions: &[Version]) {
        let path = self.path(owner, repo);
        let entry = CacheEntry {
            data: versions,
            timestamp: Self::current_timestamp_ms(),
        };

        match self.write_entry(&path, &entry).await {
            Ok(()) => info!(
                "Cached {} versions for {}/{} at {:?}",
                versions.len(),
                owner,
                repo,
                path
            ),
            Err(e) => warn!("Failed to save cache for {}/{}: {}", owner, repo, e),
        }
    }

    /// Delete the cache file for a repository.
    ///
    /// Returns `false` when there was nothing to delete.
    pub async fn clear(&self, owner: &str, repo: &str) -> Result<bool, CacheError> {
        let path = self.path(owner, repo);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Removed cache file {:?}", path);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn read_entry(path: &Path) -> Result<CacheEntry<Vec<Version>>, CacheError> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write to a uniquely named temp file in the cache directory and rename
    /// it over the target, so a concurrent reader sees either the old or the
    /// new file
    async fn write_entry(
        &self,
        path: &Path,
        entry: &CacheEntry<&[Version]>,
    ) -> Result<(), CacheError> {
        let content = serde_json::to_vec_pretty(entry)?;
        let dir = self.dir.clone();
        let path = path.to_path_buf();

        tokio::task::spawn_blocking(move || -> Result<(), CacheError> {
            std::fs::create_dir_all(&dir)?;
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(&content)?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| CacheError::Io(std::io::Error::other(e)))?
    }
}

fn sanitize_file_component(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::semver::SemanticVersion;
    use rstest::rstest;
    use serde_json::json;
    use tempfile::TempDir;

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    fn versions() -> Vec<Version> {
        vec![
            Version::new("v2.0.0", SemanticVersion::new(2, 0, 0), true)
                .with_branch("main")
                .with_repository("o", "r"),
            Version::new("v1.4.0", SemanticVersion::new(1, 4, 0), false)
                .with_branch("1.x")
                .with_repository("o", "r"),
        ]
    }

    fn write_raw(cache: &VersionCache, owner: &str, repo: &str, content: &str) {
        std::fs::create_dir_all(cache.dir()).unwrap();
        std::fs::write(cache.path(owner, repo), content).unwrap();
    }

    #[tokio::test]
    async fn set_then_get_returns_same_versions() {
        let temp_dir = TempDir::new().unwrap();
        let cache = VersionCache::new(temp_dir.path().join("nested/cache"), DAY_MS);

        cache.set("o", "r", &versions()).await;

        assert_eq!(cache.get("o", "r").await, Some(versions()));
    }

    #[tokio::test]
    async fn get_returns_none_for_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let cache = VersionCache::new(temp_dir.path(), DAY_MS);

        assert_eq!(cache.get("o", "r").await, None);
    }

    #[tokio::test]
    async fn get_returns_none_for_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let cache = VersionCache::new(temp_dir.path(), DAY_MS);
        write_raw(&cache, "o", "r", "{ not json");

        assert_eq!(cache.get("o", "r").await, None);
    }

    #[rstest]
    #[case(DAY_MS + 60_000, false)]
    #[case(DAY_MS - 60_000, true)]
    #[tokio::test]
    async fn get_respects_ttl(#[case] age_ms: i64, #[case] expect_hit: bool) {
        let temp_dir = TempDir::new().unwrap();
        let cache = VersionCache::new(temp_dir.path(), DAY_MS);
        let content = json!({
            "data": versions(),
            "timestamp": VersionCache::current_timestamp_ms() - age_ms,
        });
        write_raw(&cache, "o", "r", &content.to_string());

        assert_eq!(cache.get("o", "r").await.is_some(), expect_hit);
    }

    #[tokio::test]
    async fn entries_are_keyed_by_owner_and_repo() {
        let temp_dir = TempDir::new().unwrap();
        let cache = VersionCache::new(temp_dir.path(), DAY_MS);

        cache.set("o", "r", &versions()).await;

        assert_eq!(cache.get("o", "other").await, None);
        assert_eq!(cache.get("other", "r").await, None);
    }

    #[tokio::test]
    async fn set_swallows_write_failures() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "file in the way").unwrap();
        let cache = VersionCache::new(blocker.join("cache"), DAY_MS);

        cache.set("o", "r", &versions()).await;

        assert_eq!(cache.get("o", "r").await, None);
    }

    #[tokio::test]
    async fn clear_removes_existing_entry() {
        let temp_dir = TempDir::new().unwrap();
        let cache = VersionCache::new(temp_dir.path(), DAY_MS);
        cache.set("o", "r", &versions()).await;

        assert!(cache.clear("o", "r").await.unwrap());
        assert!(!cache.clear("o", "r").await.unwrap());
        assert_eq!(cache.get("o", "r").await, None);
    }

    #[tokio::test]
    async fn concurrent_sets_leave_one_complete_file() {
        let temp_dir = TempDir::new().unwrap();
        let cache = VersionCache::new(temp_dir.path().join("cache"), DAY_MS);
        let full = versions();
        let single = vec![full[0].clone()];

        tokio::join!(
            cache.set("o", "r", &full),
            cache.set("o", "r", &single),
            cache.set("o", "r", &full),
            cache.set("o", "r", &single),
        );

        let cached = cache.get("o", "r").await.unwrap();
        assert!(cached == full || cached == single);
        let files: Vec<_> = std::fs::read_dir(cache.dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(files, vec![std::ffi::OsString::from("github-o-r.json")]);
    }

    #[test]
    fn path_is_deterministic_and_sanitized() {
        let cache = VersionCache::new("/tmp/cache", DAY_MS);

        assert_eq!(
            cache.path("idmarinas", "advertising-bundle"),
            PathBuf::from("/tmp/cache/github-idmarinas-advertising-bundle.json")
        );
        assert_eq!(
            cache.path("https://github.com/o", "r"),
            PathBuf::from("/tmp/cache/github-https___github.com_o-r.json")
        );
    }
}
