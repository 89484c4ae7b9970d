//! GitHub API test utilities

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use mockito::{Mock, ServerGuard};
use serde_json::{Value, json};

use docs_versioning::config::{DocsConfig, GithubSource};
use docs_versioning::version::cache::VersionCache;
use docs_versioning::version::fetcher::GithubVersionsFetcher;
use docs_versioning::version::registries::GitHubRegistry;

/// A release object as returned by the "list releases" endpoint
pub fn release_json(id: u64, tag: &str, published_at: &str) -> Value {
    json!({
        "id": id,
        "tag_name": tag,
        "name": tag,
        "draft": false,
        "prerelease": false,
        "published_at": published_at,
        "target_commitish": "main",
        "tarball_url": format!("https://api.github.com/repos/o/r/tarball/{tag}"),
        "html_url": format!("https://github.com/o/r/releases/tag/{tag}"),
        "assets": []
    })
}

/// Serve `releases` for `o/r`, expecting exactly `hits` requests
pub async fn mock_releases(server: &mut ServerGuard, releases: Value, hits: usize) -> Mock {
    server
        .mock("GET", "/repos/o/r/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases.to_string())
        .expect(hits)
        .create_async()
        .await
}

/// Fetcher against the mock server, caching under `cache_dir`
pub fn test_fetcher(server: &ServerGuard, cache_dir: &Path, ttl_ms: i64) -> GithubVersionsFetcher {
    let registry = GitHubRegistry::new(&server.url(), None, Duration::from_secs(5)).unwrap();
    GithubVersionsFetcher::new(Arc::new(registry), VersionCache::new(cache_dir, ttl_ms))
}

/// Config enabling versioning for `o/r` served by the mock server
pub fn test_config(server: &ServerGuard, root_dir: &Path) -> DocsConfig {
    let mut config = DocsConfig {
        root_dir: root_dir.to_path_buf(),
        ..DocsConfig::default()
    };
    config.docs_versioning.enable = true;
    config.docs_versioning.versions.github = Some(GithubSource {
        owner: "o".to_string(),
        repo: "r".to_string(),
    });
    config.github.base_url = server.url();
    config
}
