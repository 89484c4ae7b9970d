//! Content collection definitions for every served version
//!
//! Historical versions read their pages from the release tarball of their tag,
//! mounted under the version path. The current docs read the local content
//! directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

use crate::config::ContentConfig;
use crate::site::setup::VersioningState;
use crate::version::types::CURRENT_COLLECTION;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionType {
    Page,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSource {
    /// Local directory; `None` for sources downloaded from a repository
    pub cwd: Option<PathBuf>,
    /// Archive or repository URL the source is downloaded from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    pub include: String,
    pub exclude: Vec<String>,
    /// Route prefix the pages are mounted under
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection {
    #[serde(rename = "type")]
    pub kind: CollectionType,
    pub source: CollectionSource,
}

/// One collection per historical version plus the current one, keyed by name
pub fn build_collections(
    state: &VersioningState,
    content: &ContentConfig,
    content_dir: &Path,
) -> BTreeMap<String, Collection> {
    let mut collections = BTreeMap::new();

    for version in state.versions.iter().filter(|v| !v.is_current()) {
        let repository = version
            .tarball_url()
            .map(str::to_string)
            .or_else(|| Some(version.repository().to_string()))
            .filter(|url| !url.is_empty());

        collections.insert(
            version.collection().to_string(),
            Collection {
                kind: CollectionType::Page,
                source: CollectionSource {
                    cwd: None,
                    repository,
                    include: normalize_include(&content.versioned_include),
                    exclude: content.versioned_exclude.clone(),
                    prefix: version.path().to_string(),
                },
            },
        );
    }

    let prefix = if state.enable { "/current" } else { "/" };
    collections.insert(
        CURRENT_COLLECTION.to_string(),
        Collection {
            kind: CollectionType::Page,
            source: CollectionSource {
                cwd: Some(content_dir.to_path_buf()),
                repository: None,
                include: normalize_include(&content.include),
                exclude: content.exclude.clone(),
                prefix: prefix.to_string(),
            },
        },
    );

    collections
}

/// Strip leading `./`, `../` and `/` segments from an include glob.
///
/// Globs are always relative to the source directory.
pub fn normalize_include(include: &str) -> String {
    let mut rest = include;
    loop {
        let stripped = rest
            .strip_prefix("./")
            .or_else(|| rest.strip_prefix("../"))
            .or_else(|| rest.strip_prefix('/'));
        match stripped {
            Some(s) => rest = s,
            None => break,
        }
    }

    if rest.len() != include.len() {
        warn!(
            "Collection source should not start with `./`, `../` or `/`: {}",
            include
        );
    }
    rest.to_string()
}
