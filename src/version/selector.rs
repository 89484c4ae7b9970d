//! Selection of the newest release of every major version line
//!
//! Releases are filtered to published, non-draft, non-prerelease entries with a
//! semantic version tag, grouped by major, and reduced to one representative
//! per group. The representative that is also the most recently published
//! release overall is marked as current.

use std::collections::BTreeMap;

use tracing::debug;

use crate::version::release::Release;
use crate::version::semver::SemanticVersion;

/// A release together with its parsed tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseWithVersion {
    pub release: Release,
    pub version: SemanticVersion,
    pub is_current: bool,
}

/// Keep releases that are published, not drafts, not prereleases and carry a
/// semantic version tag. Everything else is dropped silently.
pub fn valid_releases(releases: &[Release]) -> Vec<ReleaseWithVersion> {
    releases
        .iter()
        .filter(|release| {
            let keep = !release.draft && !release.prerelease && release.published_at.is_some();
            if !keep {
                debug!("Skipping unpublished, draft or prerelease {}", release.tag_name);
            }
            keep
        })
        .filter_map(|release| {
            let Some(version) = SemanticVersion::parse(&release.tag_name) else {
                debug!("Skipping non-semver tag {}", release.tag_name);
                return None;
            };
            Some(ReleaseWithVersion {
                release: release.clone(),
                version,
                is_current: false,
            })
        })
        .collect()
}

/// Partition releases by major version
pub fn group_by_major(
    releases: Vec<ReleaseWithVersion>,
) -> BTreeMap<u64, Vec<ReleaseWithVersion>> {
    let mut groups: BTreeMap<u64, Vec<ReleaseWithVersion>> = BTreeMap::new();
    for item in releases {
        groups.entry(item.version.major).or_default().push(item);
    }
    groups
}

/// The most recently published release. On equal timestamps the first one wins.
///
/// Returns `None` for an empty slice.
pub fn latest_published(releases: &[ReleaseWithVersion]) -> Option<&ReleaseWithVersion> {
    releases.iter().reduce(|latest, item| {
        if item.release.published_at > latest.release.published_at {
            item
        } else {
            latest
        }
    })
}

/// Highest release of each major version, newest major first
pub fn latest_releases_per_major(releases: &[Release]) -> Vec<ReleaseWithVersion> {
    let valid = valid_releases(releases);

    let Some(current_id) = latest_published(&valid).map(|item| item.release.id) else {
        return Vec::new();
    };

    group_by_major(valid)
        .into_values()
        .rev()
        // max_by keeps the last of equal elements, like taking the tail of a stable sort
        .filter_map(|group| group.into_iter().max_by(|a, b| a.version.cmp(&b.version)))
        .map(|mut item| {
            item.is_current = item.release.id == current_id;
            item
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn release(id: u64, tag: &str, published_at: Option<&str>) -> Release {
        Release {
            id,
            tag_name: tag.to_string(),
            draft: false,
            prerelease: false,
            published_at: published_at.map(|d| {
                DateTime::parse_from_rfc3339(d)
                    .unwrap()
                    .with_timezone(&Utc)
            }),
            target_commitish: "main".to_string(),
            tarball_url: None,
        }
    }

    fn tags(selected: &[ReleaseWithVersion]) -> Vec<(&str, bool)> {
        selected
            .iter()
            .map(|item| (item.release.tag_name.as_str(), item.is_current))
            .collect()
    }

    #[test]
    fn selects_highest_version_within_a_major() {
        let releases = vec![
            release(1, "1.0.0", Some("2023-01-01T00:00:00Z")),
            release(2, "1.2.0", Some("2023-02-01T00:00:00Z")),
            release(3, "1.1.5", Some("2023-03-01T00:00:00Z")),
        ];

        let selected = latest_releases_per_major(&releases);

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].release.tag_name, "1.2.0");
        // 1.1.5 was published last, so no representative is current
        assert!(!selected[0].is_current);
    }

    #[test]
    fn marks_most_recently_published_major_as_current() {
        let releases = vec![
            release(1, "1.9.0", Some("2023-01-01T00:00:00Z")),
            release(2, "2.0.0", Some("2024-01-01T00:00:00Z")),
        ];

        let selected = latest_releases_per_major(&releases);

        assert_eq!(tags(&selected), vec![("2.0.0", true), ("1.9.0", false)]);
    }

    #[test]
    fn current_follows_publish_date_not_version() {
        let releases = vec![
            release(1, "v2.0.0", Some("2024-01-01T00:00:00Z")),
            release(2, "v1.9.1", Some("2024-05-01T00:00:00Z")),
        ];

        let selected = latest_releases_per_major(&releases);

        assert_eq!(tags(&selected), vec![("v2.0.0", false), ("v1.9.1", true)]);
    }

    #[test]
    fn excludes_drafts_prereleases_and_unpublished() {
        let mut draft = release(1, "v9.0.0", Some("2025-01-01T00:00:00Z"));
        draft.draft = true;
        let mut prerelease = release(2, "v8.0.0", Some("2025-01-01T00:00:00Z"));
        prerelease.prerelease = true;
        let unpublished = release(3, "v7.0.0", None);
        let stable = release(4, "v1.0.0", Some("2023-01-01T00:00:00Z"));

        let selected = latest_releases_per_major(&[draft, prerelease, unpublished, stable]);

        assert_eq!(tags(&selected), vec![("v1.0.0", true)]);
    }

    #[test]
    fn prerelease_tags_without_flag_order_by_locale() {
        let releases = vec![
            release(1, "v1.0.0-Beta", Some("2023-02-01T00:00:00Z")),
            release(2, "v1.0.0-alpha", Some("2023-01-01T00:00:00Z")),
        ];

        let selected = latest_releases_per_major(&releases);

        assert_eq!(tags(&selected), vec![("v1.0.0-Beta", true)]);
    }

    #[test]
    fn excludes_tags_that_are_not_semver() {
        let releases = vec![
            release(1, "nightly", Some("2025-01-01T00:00:00Z")),
            release(2, "v1.0", Some("2025-01-01T00:00:00Z")),
            release(3, "v3.0.0", Some("2024-01-01T00:00:00Z")),
        ];

        let selected = latest_releases_per_major(&releases);

        assert_eq!(tags(&selected), vec![("v3.0.0", true)]);
    }

    #[test]
    fn returns_empty_when_nothing_survives_filtering() {
        let mut draft = release(1, "v1.0.0", Some("2025-01-01T00:00:00Z"));
        draft.draft = true;

        assert!(latest_releases_per_major(&[]).is_empty());
        assert!(latest_releases_per_major(&[draft]).is_empty());
    }

    #[test]
    fn sorts_output_by_major_descending() {
        let releases = vec![
            release(1, "v2.3.0", Some("2023-06-01T00:00:00Z")),
            release(2, "v10.0.0", Some("2024-06-01T00:00:00Z")),
            release(3, "v1.0.0", Some("2022-06-01T00:00:00Z")),
        ];

        let majors: Vec<u64> = latest_releases_per_major(&releases)
            .iter()
            .map(|item| item.version.major)
            .collect();

        assert_eq!(majors, vec![10, 2, 1]);
    }

    #[test]
    fn latest_published_prefers_first_on_tie() {
        let valid = valid_releases(&[
            release(1, "v1.0.0", Some("2024-01-01T00:00:00Z")),
            release(2, "v2.0.0", Some("2024-01-01T00:00:00Z")),
        ]);

        assert_eq!(latest_published(&valid).map(|item| item.release.id), Some(1));
        assert_eq!(latest_published(&[]), None);
    }

    #[test]
    fn group_by_major_partitions_releases() {
        let valid = valid_releases(&[
            release(1, "v1.0.0", Some("2024-01-01T00:00:00Z")),
            release(2, "v2.0.0", Some("2024-01-02T00:00:00Z")),
            release(3, "v1.1.0", Some("2024-01-03T00:00:00Z")),
        ]);

        let groups = group_by_major(valid);

        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(groups[&1].len(), 2);
        assert_eq!(groups[&2].len(), 1);
    }
}
