//! Resolve documentation versions from GitHub releases
//!
//! Flow: cache lookup, then release fetch, then per-major selection, then
//! [`Version`] construction, then best-effort cache write. Failures never
//! propagate; they end up as [`FetchOutcome::Failed`].

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::config::DocsConfig;
use crate::version::cache::VersionCache;
use crate::version::error::RegistryError;
use crate::version::registries::GitHubRegistry;
use crate::version::registry::ReleaseRegistry;
use crate::version::selector::{ReleaseWithVersion, latest_releases_per_major};
use crate::version::types::Version;

/// How a version list was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Served from a fresh cache entry, no network request made
    Cached(Vec<Version>),
    /// Fetched from the registry and written to the cache
    Fetched(Vec<Version>),
    /// The fetch failed; there are no versions
    Failed,
}

impl FetchOutcome {
    pub fn versions(&self) -> &[Version] {
        match self {
            FetchOutcome::Cached(versions) | FetchOutcome::Fetched(versions) => versions,
            FetchOutcome::Failed => &[],
        }
    }

    pub fn into_versions(self) -> Vec<Version> {
        match self {
            FetchOutcome::Cached(versions) | FetchOutcome::Fetched(versions) => versions,
            FetchOutcome::Failed => Vec::new(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FetchOutcome::Cached(_) => "cached",
            FetchOutcome::Fetched(_) => "fetched",
            FetchOutcome::Failed => "failed",
        }
    }
}

pub struct GithubVersionsFetcher {
    registry: Arc<dyn ReleaseRegistry>,
    cache: VersionCache,
}

impl GithubVersionsFetcher {
    pub fn new(registry: Arc<dyn ReleaseRegistry>, cache: VersionCache) -> Self {
        Self { registry, cache }
    }

    /// Fetcher backed by the GitHub API and cache settings of `config`
    pub fn from_config(config: &DocsConfig) -> Result<Self, RegistryError> {
        let registry = GitHubRegistry::new(
            &config.github.base_url,
            config.github.token(),
            Duration::from_millis(config.github.timeout),
        )?;
        let cache = VersionCache::new(config.cache_dir(), config.cache.ttl);

        Ok(Self::new(Arc::new(registry), cache))
    }

    pub fn cache(&self) -> &VersionCache {
        &self.cache
    }

    /// Resolve the versions of `owner/repo`, preferring a fresh cache entry
    pub async fn fetch(&self, owner: &str, repo: &str) -> FetchOutcome {
        if let Some(versions) = self.cache.get(owner, repo).await {
            info!(
                "Using {} cached versions for {}/{}",
                versions.len(),
                owner,
                repo
            );
            return FetchOutcome::Cached(versions);
        }

        let releases = match self.registry.fetch_releases(owner, repo).await {
            Ok(releases) => releases,
            Err(e) => {
                error!("Error obtaining versions from {}/{}: {}", owner, repo, e);
                return FetchOutcome::Failed;
            }
        };

        let versions = build_versions(owner, repo, latest_releases_per_major(&releases));
        info!(
            "Resolved {} versions from {} releases of {}/{}",
            versions.len(),
            releases.len(),
            owner,
            repo
        );

        self.cache.set(owner, repo, &versions).await;

        FetchOutcome::Fetched(versions)
    }

    /// [`GithubVersionsFetcher::fetch`] without the outcome detail
    pub async fn fetch_versions(&self, owner: &str, repo: &str) -> Vec<Version> {
        self.fetch(owner, repo).await.into_versions()
    }
}

/// Turn selected releases into versions attached to `owner/repo`
pub fn build_versions(owner: &str, repo: &str, selected: Vec<ReleaseWithVersion>) -> Vec<Version> {
    selected
        .into_iter()
        .map(|item| {
            let tarball_url = item.release.tarball_url.unwrap_or_default();
            Version::new(item.release.tag_name, item.version, item.is_current)
                .with_branch(item.release.target_commitish)
                .with_repository(owner, repo)
                .with_tarball_url(&tarball_url)
        })
        .collect()
}
