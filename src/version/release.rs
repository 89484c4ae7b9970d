//! Release records returned by the GitHub "list releases" endpoint

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A GitHub release. Fields this crate does not use are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub target_commitish: String,
    #[serde(default)]
    pub tarball_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_ignores_unknown_fields_and_accepts_null_published_at() {
        let releases: Vec<Release> = serde_json::from_str(
            r#"[
                {
                    "id": 1,
                    "tag_name": "v1.0.0",
                    "draft": false,
                    "prerelease": false,
                    "published_at": "2024-06-01T12:00:00Z",
                    "target_commitish": "main",
                    "tarball_url": "https://api.github.com/repos/o/r/tarball/v1.0.0",
                    "assets": [],
                    "author": {"login": "someone"}
                },
                {
                    "id": 2,
                    "tag_name": "v2.0.0",
                    "draft": true,
                    "prerelease": false,
                    "published_at": null,
                    "target_commitish": "2.x",
                    "tarball_url": null
                }
            ]"#,
        )
        .unwrap();

        assert_eq!(releases.len(), 2);
        assert_eq!(
            releases[0].published_at.map(|d| d.to_rfc3339()),
            Some("2024-06-01T12:00:00+00:00".to_string())
        );
        assert_eq!(releases[0].target_commitish, "main");
        assert_eq!(releases[1].published_at, None);
        assert_eq!(releases[1].tarball_url, None);
        assert!(releases[1].draft);
    }
}
