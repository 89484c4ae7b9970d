//! Versioning state resolved once from configuration

use serde::Serialize;
use tracing::info;

use crate::config::DocsVersioningConfig;
use crate::version::fetcher::{FetchOutcome, GithubVersionsFetcher};
use crate::version::types::Version;

/// Where the resolved versions came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionSource {
    Disabled,
    Static,
    Cached,
    Fetched,
    Failed,
    /// Enabled without a static list or a GitHub source
    Unconfigured,
}

/// Versions the site serves, handed to collection and switcher builders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersioningState {
    pub enable: bool,
    pub source: VersionSource,
    pub versions: Vec<Version>,
}

impl VersioningState {
    pub fn disabled() -> Self {
        Self {
            enable: false,
            source: VersionSource::Disabled,
            versions: Vec::new(),
        }
    }

    pub fn current(&self) -> Option<&Version> {
        self.versions.iter().find(|v| v.is_current())
    }
}

/// Resolve the versions to serve.
///
/// A non-empty static list wins; otherwise the GitHub source is fetched.
pub async fn resolve_versions(
    config: &DocsVersioningConfig,
    fetcher: &GithubVersionsFetcher,
) -> VersioningState {
    if !config.enable {
        info!("Docs versioning disabled");
        return VersioningState::disabled();
    }

    if let Some(versions) = config
        .versions
        .static_versions
        .as_ref()
        .filter(|versions| !versions.is_empty())
    {
        info!("Using {} statically configured versions", versions.len());
        return VersioningState {
            enable: true,
            source: VersionSource::Static,
            versions: versions.clone(),
        };
    }

    let Some(github) = &config.versions.github else {
        info!("Docs versioning enabled without a version source");
        return VersioningState {
            enable: true,
            source: VersionSource::Unconfigured,
            versions: Vec::new(),
        };
    };

    let (source, versions) = match fetcher.fetch(&github.owner, &github.repo).await {
        FetchOutcome::Cached(versions) => (VersionSource::Cached, versions),
        FetchOutcome::Fetched(versions) => (VersionSource::Fetched, versions),
        FetchOutcome::Failed => (VersionSource::Failed, Vec::new()),
    };

    VersioningState {
        enable: true,
        source,
        versions,
    }
}
