//! Semantic version parsing and ordering for release tags

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `major.minor.patch[-prerelease][+build]`, after the optional `v` prefix is stripped
static SEMVER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([0-9]+)\.([0-9]+)\.([0-9]+)(?:-([0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?(?:\+([0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?$",
    )
    .expect("semantic version pattern must compile")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid semantic version: {0}")]
pub struct ParseVersionError(pub String);

/// A parsed `major.minor.patch` triple with optional qualifiers.
///
/// Ordering and equality ignore `build`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerelease: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,
}

impl SemanticVersion {
    /// `0.0.0`, used for placeholder versions.
    pub const ZERO: SemanticVersion = SemanticVersion {
        major: 0,
        minor: 0,
        patch: 0,
        prerelease: None,
        build: None,
    };

    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: None,
            build: None,
        }
    }

    /// Parse a release tag such as `v1.2.3` or `2.0.0-rc.1+build.5`.
    ///
    /// Returns `None` when the tag does not follow the grammar or a numeric
    /// component does not fit in a `u64`.
    pub fn parse(tag: &str) -> Option<Self> {
        let clean = tag.strip_prefix('v').unwrap_or(tag);
        let caps = SEMVER_RE.captures(clean)?;

        Some(Self {
            major: caps[1].parse().ok()?,
            minor: caps[2].parse().ok()?,
            patch: caps[3].parse().ok()?,
            prerelease: caps.get(4).map(|m| m.as_str().to_string()),
            build: caps.get(5).map(|m| m.as_str().to_string()),
        })
    }

    /// Like [`SemanticVersion::parse`], but falls back to [`SemanticVersion::ZERO`].
    pub fn parse_or_zero(tag: &str) -> Self {
        Self::parse(tag).unwrap_or(Self::ZERO)
    }

}

impl FromStr for SemanticVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseVersionError(s.to_string()))
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            write!(f, "-{pre}")?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{build}")?;
        }
        Ok(())
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            // A release sorts after any of its pre-releases
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => collate(a, b),
            })
    }
}

/// Root-locale collation over the prerelease alphabet `[0-9A-Za-z.-]`.
///
/// Letters compare case-insensitively first. Equal strings are then ordered
/// by case at the first difference, lowercase before uppercase.
fn collate(a: &str, b: &str) -> Ordering {
    let folded = |s: &str| s.chars().map(|c| c.to_ascii_lowercase()).collect::<Vec<_>>();
    let case = |s: &str| s.chars().map(|c| c.is_ascii_uppercase()).collect::<Vec<_>>();

    folded(a).cmp(&folded(b)).then_with(|| case(a).cmp(&case(b)))
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SemanticVersion {}
