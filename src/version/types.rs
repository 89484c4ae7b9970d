//! Documentation version exposed to the site

use serde::{Deserialize, Serialize};
use url::Url;

use crate::version::semver::SemanticVersion;

/// Collection holding the current documentation
pub const CURRENT_COLLECTION: &str = "docs_versioning";

/// Path segment of the current documentation
pub const CURRENT_PATH_SEGMENT: &str = "current";

/// Badge color used by the version switcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    Primary,
    Secondary,
    Success,
    Info,
    Warning,
    Error,
    Neutral,
}

/// One servable version of the documentation.
///
/// `label`, `path`, `collection` and the default `tag_color` derive from
/// `semver` and `is_current` at construction. `repository` is recomputed by
/// [`Version::with_repository`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "VersionRecord")]
pub struct Version {
    label: String,
    tag: String,
    semver: SemanticVersion,
    is_current: bool,
    branch: String,
    owner: String,
    repo: String,
    path: String,
    collection: String,
    tag_color: TagColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    tarball_url: Option<String>,
    repository: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    repository_url: String,
}

impl Version {
    pub fn new(tag: impl Into<String>, semver: SemanticVersion, is_current: bool) -> Self {
        let tag_color = if is_current {
            TagColor::Info
        } else {
            TagColor::Primary
        };
        let path = if is_current {
            format!("/{CURRENT_PATH_SEGMENT}")
        } else {
            format!("/{}.x", semver.major)
        };
        let collection = if is_current {
            CURRENT_COLLECTION.to_string()
        } else {
            format!("{CURRENT_COLLECTION}_v{}", semver.major)
        };

        Self {
            label: format!("Version {}", semver.major),
            tag: tag.into(),
            semver,
            is_current,
            branch: String::new(),
            owner: String::new(),
            repo: String::new(),
            path,
            collection,
            tag_color,
            tarball_url: None,
            repository: String::new(),
            repository_url: String::new(),
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Set the source repository.
    ///
    /// `owner` may also be a full `http(s)` URL to a repository, in which case
    /// `repo` is ignored and the URL is normalized to point at `/tree/{tag}`.
    pub fn with_repository(mut self, owner: &str, repo: &str) -> Self {
        match Url::parse(owner) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                let url = url.as_str().trim_end_matches('/').to_string();
                let tree = format!("/tree/{}", self.tag);

                self.repository_url = if url.ends_with(&tree) {
                    url
                } else if url.ends_with("/tree") {
                    format!("{url}/{}", self.tag)
                } else {
                    format!("{url}{tree}")
                };
            }
            _ => {
                self.owner = owner.to_string();
                self.repo = repo.to_string();
            }
        }

        self.repository = self.compute_repository();
        self
    }

    /// Set the tarball URL; values that are not absolute URLs are ignored.
    pub fn with_tarball_url(mut self, tarball_url: &str) -> Self {
        if Url::parse(tarball_url).is_ok() {
            self.tarball_url = Some(tarball_url.to_string());
        }
        self
    }

    pub fn with_tag_color(mut self, color: TagColor) -> Self {
        self.tag_color = color;
        self
    }

    fn compute_repository(&self) -> String {
        if !self.repository_url.is_empty() {
            return self.repository_url.clone();
        }
        if self.owner.is_empty() && self.repo.is_empty() {
            return String::new();
        }
        format!(
            "https://github.com/{}/{}/tree/{}",
            self.owner, self.repo, self.tag
        )
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn semver(&self) -> &SemanticVersion {
        &self.semver
    }

    pub fn is_current(&self) -> bool {
        self.is_current
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// URL path prefix, e.g. `/current` or `/2.x`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// [`Version::path`] without the leading slash
    pub fn path_segment(&self) -> &str {
        self.path.trim_start_matches('/')
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn tag_color(&self) -> TagColor {
        self.tag_color
    }

    pub fn tarball_url(&self) -> Option<&str> {
        self.tarball_url.as_deref()
    }

    /// Browsable URL of the repository at this version's tag
    pub fn repository(&self) -> &str {
        &self.repository
    }
}

/// Serialized form of [`Version`], as found in cache files and static configuration.
///
/// Only `tag` is required. Derived fields present in the input are ignored and
/// recomputed, except an explicit `tagColor`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct VersionRecord {
    tag: String,
    semver: Option<SemanticVersion>,
    is_current: bool,
    branch: String,
    owner: String,
    repo: String,
    tag_color: Option<TagColor>,
    tarball_url: Option<String>,
    repository_url: String,
}

impl From<VersionRecord> for Version {
    fn from(record: VersionRecord) -> Self {
        let semver = record
            .semver
            .unwrap_or_else(|| SemanticVersion::parse_or_zero(&record.tag));

        let mut version = Version::new(record.tag, semver, record.is_current)
            .with_branch(record.branch);

        if !record.repository_url.is_empty() {
            version = version.with_repository(&record.repository_url, "");
        } else if !record.owner.is_empty() || !record.repo.is_empty() {
            version = version.with_repository(&record.owner, &record.repo);
        }
        if let Some(tarball_url) = record.tarball_url {
            version = version.with_tarball_url(&tarball_url);
        }
        if let Some(color) = record.tag_color {
            version = version.with_tag_color(color);
        }

        version
    }
}
