//! Version labels derived from a changelog directory
//!
//! The changelog holds one subdirectory per section, each with one markdown
//! file per release named `{major}_{minor}_{patch}.md`. Release dates come
//! from the `date:` key of the file's frontmatter, credited authors from its
//! `authors:` key.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::version::types::TagColor;

static FILE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)_([0-9]+)_([0-9]+)\.md$").expect("file name pattern must compile")
});

static FRONTMATTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---\n(.*?)\n---").expect("frontmatter pattern must compile")
});

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"date:\s*(.+)").expect("date pattern must compile"));

static AUTHORS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^authors:[ \t]*(.*)$").expect("authors pattern must compile")
});

static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-\s*(.*)$").expect("list item pattern must compile"));

const LABEL_ICON: &str = "i-tabler-tag";
const TOOLTIP_DELAY_MS: u64 = 300;

/// A release file found in the changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    pub label: String,
    pub color: TagColor,
    pub icon: String,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub arrow: bool,
    pub delay_duration: u64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub avatar: Avatar,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub src: String,
}

/// The `authors:` key of a release file's frontmatter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorsField {
    /// No key, or an empty value
    Missing,
    One(String),
    Many(Vec<String>),
}

/// Release files of every subdirectory, in file name order
pub fn scan(dir: &Path) -> io::Result<Vec<ChangelogEntry>> {
    let mut entries = Vec::new();

    for section in sorted_entries(dir)? {
        if !section.is_dir() {
            continue;
        }

        for file in sorted_entries(&section)? {
            let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(caps) = FILE_NAME_RE.captures(name) else {
                continue;
            };
            let number = |i: usize| caps[i].parse::<u64>().ok();
            let (Some(major), Some(minor), Some(patch)) = (number(1), number(2), number(3)) else {
                continue;
            };

            entries.push(ChangelogEntry {
                major,
                minor,
                patch,
                path: file,
            });
        }
    }

    Ok(entries)
}

fn sorted_entries(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()?;
    paths.sort();
    Ok(paths)
}

/// Distinct `major.minor` versions, newest first
pub fn versions_major_minor(dir: &Path) -> Vec<String> {
    let entries = match scan(dir) {
        Ok(entries) => entries,
        Err(e) => {
            error!("Failed to read changelog directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    entries
        .iter()
        .map(|entry| (entry.major, entry.minor))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .map(|(major, minor)| format!("{major}.{minor}"))
        .collect()
}

/// Release date per major, majors descending.
///
/// The first release file of a major that carries a date provides it. Majors
/// without any dated release are left out.
pub fn majors_with_date(dir: &Path) -> IndexMap<String, String> {
    let entries = match scan(dir) {
        Ok(entries) => entries,
        Err(e) => {
            error!("Failed to read changelog directory {}: {}", dir.display(), e);
            return IndexMap::new();
        }
    };

    let mut dates: IndexMap<u64, Option<String>> = IndexMap::new();
    for entry in &entries {
        let slot = dates.entry(entry.major).or_default();
        if slot.is_none() {
            *slot = read_date(&entry.path);
        }
    }

    dates.sort_by(|a, _, b, _| b.cmp(a));
    dates
        .into_iter()
        .filter_map(|(major, date)| date.map(|date| (major.to_string(), date)))
        .collect()
}

/// Badge labels keyed by `v{major}_{minor}`; the newest version is
/// highlighted.
pub fn labels_for_versions(dir: &Path) -> IndexMap<String, Label> {
    versions_major_minor(dir)
        .into_iter()
        .enumerate()
        .map(|(index, version)| {
            let key = format!("v{}", version.replacen('.', "_", 1));
            let color = if index == 0 {
                TagColor::Primary
            } else {
                TagColor::Secondary
            };
            let label = Label {
                label: version.clone(),
                color,
                icon: LABEL_ICON.to_string(),
                tooltip: Tooltip {
                    arrow: true,
                    delay_duration: TOOLTIP_DELAY_MS,
                    text: format!("New in version {version}"),
                },
            };
            (key, label)
        })
        .collect()
}

/// Authors credited on every release, newest release first.
///
/// Keys are `major.minor.patch`. Names are resolved against `known`; see
/// [`resolve_authors`].
pub fn authors_by_release(
    dir: &Path,
    known: &IndexMap<String, Author>,
    default_author: Option<&str>,
) -> IndexMap<String, Vec<Author>> {
    let mut entries = match scan(dir) {
        Ok(entries) => entries,
        Err(e) => {
            error!("Failed to read changelog directory {}: {}", dir.display(), e);
            return IndexMap::new();
        }
    };
    entries.sort_by(|a, b| (b.major, b.minor, b.patch).cmp(&(a.major, a.minor, a.patch)));

    entries
        .iter()
        .map(|entry| {
            let field = read_frontmatter(&entry.path)
                .map(|content| frontmatter_authors(&content))
                .unwrap_or(AuthorsField::Missing);
            let key = format!("{}.{}.{}", entry.major, entry.minor, entry.patch);
            (key, resolve_authors(&field, known, default_author))
        })
        .collect()
}

/// Turn author usernames into known authors.
///
/// Releases naming nobody are credited to the default author. Unknown names
/// are dropped.
pub fn resolve_authors(
    field: &AuthorsField,
    known: &IndexMap<String, Author>,
    default_author: Option<&str>,
) -> Vec<Author> {
    let lookup = |name: &str| {
        let author = known.get(name).cloned();
        if author.is_none() {
            warn!("Unknown changelog author {}", name);
        }
        author
    };

    match field {
        AuthorsField::Missing => default_author.and_then(lookup).into_iter().collect(),
        AuthorsField::Many(names) if names.is_empty() => {
            default_author.and_then(lookup).into_iter().collect()
        }
        AuthorsField::One(name) => lookup(name).into_iter().collect(),
        AuthorsField::Many(names) => names.iter().filter_map(|name| lookup(name)).collect(),
    }
}

/// Parse the `authors:` key of a frontmatter block.
///
/// Accepts a scalar (`authors: jdoe`), a flow list (`authors: [a, b]`) or a
/// block list of `- name` lines. Block items that are mappings are skipped.
pub fn frontmatter_authors(frontmatter: &str) -> AuthorsField {
    let Some(caps) = AUTHORS_RE.captures(frontmatter) else {
        return AuthorsField::Missing;
    };
    let Some(value) = caps.get(1) else {
        return AuthorsField::Missing;
    };
    let inline = value.as_str().trim();

    if let Some(list) = inline.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
        return AuthorsField::Many(
            list.split(',')
                .map(unquote)
                .filter(|name| !name.is_empty())
                .collect(),
        );
    }
    if !inline.is_empty() {
        let name = unquote(inline);
        return if name.is_empty() {
            AuthorsField::Missing
        } else {
            AuthorsField::One(name)
        };
    }

    let items: Vec<String> = frontmatter[value.end()..]
        .lines()
        .skip(1)
        .map_while(|line| LIST_ITEM_RE.captures(line).map(|c| c[1].trim().to_string()))
        .collect();
    if items.is_empty() {
        return AuthorsField::Missing;
    }

    AuthorsField::Many(
        items
            .iter()
            .filter(|item| !item.is_empty() && !item.contains(':'))
            .map(|item| unquote(item))
            .collect(),
    )
}

fn unquote(value: &str) -> String {
    value.trim().trim_matches(['"', '\'']).to_string()
}

fn read_file(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}

fn read_frontmatter(path: &Path) -> Option<String> {
    let content = read_file(path)?;
    FRONTMATTER_RE
        .captures(&content)?
        .get(1)
        .map(|m| m.as_str().to_string())
}

fn read_date(path: &Path) -> Option<String> {
    frontmatter_date(&read_file(path)?)
}

fn frontmatter_date(content: &str) -> Option<String> {
    let frontmatter = FRONTMATTER_RE.captures(content)?.get(1)?.as_str();
    let date = DATE_RE.captures(frontmatter)?.get(1)?.as_str().trim();
    (!date.is_empty()).then(|| date.to_string())
}
