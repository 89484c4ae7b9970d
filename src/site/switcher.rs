//! Version switcher entries for the page being viewed

use serde::Serialize;

use crate::site::routing::parse_route;
use crate::site::setup::VersioningState;
use crate::version::semver::SemanticVersion;
use crate::version::types::{CURRENT_COLLECTION, TagColor, Version};

const CHECKBOX: &str = "checkbox";

/// One switcher entry.
///
/// The selected entry is rendered as a checked box; the others link to the
/// same page in their version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitcherItem {
    #[serde(flatten)]
    pub version: Version,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<TagColor>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitcherState {
    pub is_enabled: bool,
    /// Version of the page being viewed
    pub version: Version,
    pub items: Vec<SwitcherItem>,
    pub collection_name: String,
}

impl SwitcherState {
    pub fn disabled() -> Self {
        let version = placeholder();
        Self {
            is_enabled: false,
            collection_name: version.collection().to_string(),
            version,
            items: Vec::new(),
        }
    }

    /// Switcher state for a route path
    pub fn resolve(state: &VersioningState, route_path: &str) -> Self {
        if !state.enable {
            return Self::disabled();
        }

        let params = parse_route(route_path);
        let Some(selected) = select_version(&state.versions, &params.v) else {
            return Self {
                is_enabled: true,
                ..Self::disabled()
            };
        };

        Self {
            is_enabled: true,
            items: switcher_items(&state.versions, selected, route_path),
            collection_name: selected.collection().to_string(),
            version: selected.clone(),
        }
    }
}

fn placeholder() -> Version {
    Version::new("0.0.0", SemanticVersion::ZERO, true)
}

/// Version whose path matches the `v` route param, falling back to the
/// current version, then the first one.
pub fn select_version<'a>(versions: &'a [Version], route_v: &str) -> Option<&'a Version> {
    let path = format!("/{route_v}");
    versions
        .iter()
        .find(|v| !route_v.is_empty() && v.path() == path)
        .or_else(|| versions.iter().find(|v| v.is_current()))
        .or_else(|| versions.first())
}

pub fn switcher_items(versions: &[Version], selected: &Version, route_path: &str) -> Vec<SwitcherItem> {
    versions
        .iter()
        .map(|version| {
            if version.path() == selected.path() {
                SwitcherItem {
                    version: version.clone(),
                    checked: Some(true),
                    color: Some(version.tag_color()),
                    kind: Some(CHECKBOX),
                    to: None,
                }
            } else {
                SwitcherItem {
                    version: version.clone(),
                    checked: None,
                    color: None,
                    kind: None,
                    to: Some(route_path.replacen(selected.path(), version.path(), 1)),
                }
            }
        })
        .collect()
}
