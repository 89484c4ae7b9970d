//! Route parameters of versioned, localized doc pages
//!
//! Pages live under `/:v(current|\d+\.x)?/:lang(\w{2})?/:slug(.*)*`. Before a
//! page renders, missing or disallowed `v` and `lang` parameters are filled in
//! or cleared and the request is redirected to the normalized path.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::version::types::CURRENT_PATH_SEGMENT;

static ROUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(?:(current|[0-9]+\.x)(?:/|$))?(?:([A-Za-z0-9_]{2})(?:/|$))?(.*)$")
        .expect("route pattern must compile")
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteParams {
    /// Version segment, `current` or `{major}.x`; empty when absent
    pub v: String,
    /// Two-letter locale; empty when absent
    pub lang: String,
    pub slug: Vec<String>,
}

impl RouteParams {
    /// Render the params back into a path
    pub fn to_path(&self) -> String {
        let segments: Vec<&str> = [self.v.as_str(), self.lang.as_str()]
            .into_iter()
            .chain(self.slug.iter().map(String::as_str))
            .filter(|s| !s.is_empty())
            .collect();

        format!("/{}", segments.join("/"))
    }
}

/// Split a path into route params. Every path matches; unknown leading
/// segments end up in the slug.
pub fn parse_route(path: &str) -> RouteParams {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let normalized = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    let Some(caps) = ROUTE_RE.captures(&normalized) else {
        return RouteParams::default();
    };
    let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default();

    RouteParams {
        v: group(1).to_string(),
        lang: group(2).to_string(),
        slug: group(3)
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

/// Locale state of the site
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleContext {
    /// Whether i18n is active at all
    pub enabled: bool,
    pub current: String,
    pub available: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum RouteDecision {
    /// Render as requested, switching the active locale if set
    Continue { set_locale: Option<String> },
    /// Navigate to the normalized route
    Redirect {
        params: RouteParams,
        path: String,
        set_locale: Option<String>,
    },
}

/// Fill in or clear the `lang` and `v` params
pub fn normalize_route(
    params: &RouteParams,
    locale: &LocaleContext,
    versioning_enabled: bool,
) -> RouteDecision {
    let mut normalized = params.clone();
    let mut set_locale = None;

    if locale.enabled {
        if normalized.lang.is_empty() {
            normalized.lang = locale.current.clone();
        } else if locale.available.contains(&normalized.lang) {
            set_locale = Some(normalized.lang.clone());
        } else {
            normalized.lang = locale.current.clone();
        }
    } else {
        normalized.lang.clear();
    }

    if versioning_enabled {
        if normalized.v.is_empty() {
            normalized.v = CURRENT_PATH_SEGMENT.to_string();
        }
    } else {
        normalized.v.clear();
    }

    if normalized == *params {
        RouteDecision::Continue { set_locale }
    } else {
        RouteDecision::Redirect {
            path: normalized.to_path(),
            params: normalized,
            set_locale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn params(v: &str, lang: &str, slug: &[&str]) -> RouteParams {
        RouteParams {
            v: v.to_string(),
            lang: lang.to_string(),
            slug: slug.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn locales() -> LocaleContext {
        LocaleContext {
            enabled: true,
            current: "en".to_string(),
            available: vec!["en".to_string(), "es".to_string()],
        }
    }

    #[rstest]
    #[case("/", params("", "", &[]))]
    #[case("/current", params("current", "", &[]))]
    #[case("/2.x/es/guide/install", params("2.x", "es", &["guide", "install"]))]
    #[case("/en/guide", params("", "en", &["guide"]))]
    #[case("/guide/intro/", params("", "", &["guide", "intro"]))]
    #[case("/current/getting-started", params("current", "", &["getting-started"]))]
    #[case("/3.xy/en", params("", "", &["3.xy", "en"]))]
    #[case("current/es?tab=1#top", params("current", "es", &[]))]
    fn parse_route_splits_params(#[case] path: &str, #[case] expected: RouteParams) {
        assert_eq!(parse_route(path), expected);
    }

    #[rstest]
    #[case(params("", "", &[]), "/")]
    #[case(params("current", "en", &["a", "b"]), "/current/en/a/b")]
    #[case(params("1.x", "", &["a"]), "/1.x/a")]
    fn to_path_joins_non_empty_segments(#[case] params: RouteParams, #[case] expected: &str) {
        assert_eq!(params.to_path(), expected);
    }

    #[test]
    fn known_locale_and_version_continue_with_locale_switch() {
        let decision = normalize_route(&params("2.x", "es", &["guide"]), &locales(), true);

        assert_eq!(
            decision,
            RouteDecision::Continue {
                set_locale: Some("es".to_string())
            }
        );
    }

    #[test]
    fn missing_params_redirect_to_current_locale_and_version() {
        let decision = normalize_route(&params("", "", &["guide"]), &locales(), true);

        assert_eq!(
            decision,
            RouteDecision::Redirect {
                params: params("current", "en", &["guide"]),
                path: "/current/en/guide".to_string(),
                set_locale: None,
            }
        );
    }

    #[test]
    fn unknown_locale_is_replaced() {
        let decision = normalize_route(&params("current", "fr", &[]), &locales(), true);

        assert_eq!(
            decision,
            RouteDecision::Redirect {
                params: params("current", "en", &[]),
                path: "/current/en".to_string(),
                set_locale: None,
            }
        );
    }

    #[test]
    fn params_are_cleared_when_features_are_off() {
        let decision = normalize_route(
            &params("1.x", "en", &["guide"]),
            &LocaleContext::default(),
            false,
        );

        assert_eq!(
            decision,
            RouteDecision::Redirect {
                params: params("", "", &["guide"]),
                path: "/guide".to_string(),
                set_locale: None,
            }
        );
    }

    #[test]
    fn plain_route_without_features_continues() {
        let decision = normalize_route(&params("", "", &["guide"]), &LocaleContext::default(), false);

        assert_eq!(decision, RouteDecision::Continue { set_locale: None });
    }

    #[test]
    fn redirect_serializes_with_action_tag() {
        let decision = normalize_route(&params("", "", &[]), &LocaleContext::default(), true);

        let value = serde_json::to_value(&decision).unwrap();

        assert_eq!(value["action"], "redirect");
        assert_eq!(value["path"], "/current");
        assert!(value.get("setLocale").is_some());
        assert!(value.get("set_locale").is_none());
    }

    #[test]
    fn continue_serializes_fields_in_camel_case() {
        let decision = normalize_route(&params("current", "es", &[]), &locales(), true);

        let value = serde_json::to_value(&decision).unwrap();

        assert_eq!(
            value,
            serde_json::json!({"action": "continue", "setLocale": "es"})
        );
    }
}
