//! Redirect normalizer.
//!
//! Classifies a request path as "serve" or "permanent redirect" before any
//! static file or page render is attempted. Rules form an ordered list
//! evaluated top to bottom; the first rule that produces a target wins.

use crate::i18n::Language;
use anyhow::{Context, Result};
use regex::{Captures, Regex};
use std::sync::OnceLock;
use tracing::info;

static STATIC_FILE_REGEX: OnceLock<Regex> = OnceLock::new();
static TWO_SEGMENT_REGEX: OnceLock<Regex> = OnceLock::new();

/// Root of the default language, the landing point for every invalid URL.
pub fn default_root() -> String {
    format!("/{}", Language::default_language().code())
}

/// A path that ends in a file extension (`/logo.png`, `/a/b.min.js`).
pub fn is_static_asset(path: &str) -> bool {
    STATIC_FILE_REGEX
        .get_or_init(|| Regex::new(r"\.[a-zA-Z0-9]+$").unwrap())
        .is_match(path)
}

pub fn is_api_path(path: &str) -> bool {
    path.starts_with("/api")
}

/// First segment is a supported language code.
pub fn has_language_prefix(path: &str) -> bool {
    let first = path.trim_start_matches('/').split('/').next().unwrap_or_default();
    Language::from_code(first).is_ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Serve,
    Redirect { target: String, rule: &'static str },
}

#[derive(Debug)]
enum Matcher {
    /// Route-style pattern with `:param` and trailing `*` captures.
    Route { regex: Regex, target: String },
    /// Path starts with a legacy root literal, has no language prefix, and
    /// is neither a static asset nor an API call.
    InvalidRoot { prefixes: Vec<String> },
    /// `/<first>/<rest>` where `first` is a known bad segment.
    InvalidFirstSegment { segments: Vec<String> },
}

#[derive(Debug)]
pub struct RedirectRule {
    name: &'static str,
    matcher: Matcher,
}

impl RedirectRule {
    /// A route pattern such as `/services-details/:id` or `/assets/*`.
    ///
    /// Matching is case-insensitive and accepts one trailing slash. In
    /// `target`, `:name` segments are filled from the captured parameters and
    /// `*` from the wildcard.
    pub fn route(name: &'static str, pattern: &str, target: &str) -> Result<Self> {
        let regex = compile_route(pattern)
            .with_context(|| format!("Invalid redirect pattern '{}'", pattern))?;
        Ok(Self {
            name,
            matcher: Matcher::Route {
                regex,
                target: target.to_string(),
            },
        })
    }

    pub fn invalid_root(name: &'static str, prefixes: &[&str]) -> Self {
        Self {
            name,
            matcher: Matcher::InvalidRoot {
                prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
            },
        }
    }

    pub fn invalid_first_segment(name: &'static str, segments: &[&str]) -> Self {
        Self {
            name,
            matcher: Matcher::InvalidFirstSegment {
                segments: segments.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Target path if this rule matches `path`.
    pub fn apply(&self, path: &str) -> Option<String> {
        match &self.matcher {
            Matcher::Route { regex, target } => {
                let caps = regex.captures(path)?;
                Some(fill_target(target, &caps))
            }
            Matcher::InvalidRoot { prefixes } => {
                let matched = prefixes.iter().any(|p| path.starts_with(p.as_str()));
                let redirect = matched
                    && !has_language_prefix(path)
                    && !is_static_asset(path)
                    && !is_api_path(path);
                redirect.then(default_root)
            }
            Matcher::InvalidFirstSegment { segments } => {
                let caps = TWO_SEGMENT_REGEX
                    .get_or_init(|| Regex::new(r"^/([^/]+)/(.*)$").unwrap())
                    .captures(path)?;
                let first = &caps[1];
                let rest = &caps[2];
                if Language::from_code(first).is_ok() {
                    return None;
                }
                segments
                    .iter()
                    .any(|s| s == first)
                    .then(|| format!("{}/{}", default_root(), rest))
            }
        }
    }
}

/// Ordered rule list, first match wins.
#[derive(Debug)]
pub struct RedirectNormalizer {
    rules: Vec<RedirectRule>,
}

impl RedirectNormalizer {
    pub fn new(rules: Vec<RedirectRule>) -> Self {
        Self { rules }
    }

    /// The site's redirect table.
    pub fn site() -> Result<Self> {
        Ok(Self::new(vec![
            // Root
            RedirectRule::route("root", "/", "/ar")?,
            // Legacy detail pages without a language prefix
            RedirectRule::route(
                "nested-services-details",
                "/projects-details/services-details/:id",
                "/ar/services-details/:id",
            )?,
            RedirectRule::route(
                "missing-language",
                "/projects-details/:id",
                "/ar/projects-details/:id",
            )?,
            RedirectRule::route(
                "missing-language",
                "/services-details/:id",
                "/ar/services-details/:id",
            )?,
            RedirectRule::route("missing-language", "/blogs/:id", "/ar/blogs/:id")?,
            // Old asset directory, never served by this site
            RedirectRule::route("legacy-assets", "/assets/*", "/ar")?,
            // Historical malformed URLs
            RedirectRule::route("malformed-url", "/about-us/contact-us", "/ar/contact-us")?,
            RedirectRule::route("malformed-url", "/about-us/blogs/*", "/ar/blogs/*")?,
            // Folder names from the public directory that got indexed
            RedirectRule::invalid_root(
                "public-folder-pattern",
                &[
                    "/about-us-page",
                    "/about-us",
                    "/contact_us_page",
                    "/contact-us",
                    "/contactus",
                    "/projects-page",
                    "/services-page",
                    "/details",
                    "/DownloadSection",
                    "/footer",
                    "/hero",
                    "/my-fav.ico",
                    "/national-day-img",
                    "/not-found",
                    "/see_more",
                    "/social_media_icons",
                    "/svgs",
                    "/fonts",
                    "/images",
                ],
            ),
            RedirectRule::invalid_first_segment(
                "invalid-language-segment",
                &["services-page", "projects-page", "assets"],
            ),
        ]))
    }

    pub fn rules(&self) -> &[RedirectRule] {
        &self.rules
    }

    /// Classify `path` (no query string).
    pub fn classify(&self, path: &str) -> Decision {
        for rule in &self.rules {
            if let Some(target) = rule.apply(path) {
                info!("🔄 Redirect [{}]: {} → {}", rule.name, path, target);
                return Decision::Redirect {
                    target,
                    rule: rule.name,
                };
            }
        }
        Decision::Serve
    }
}

fn compile_route(pattern: &str) -> Result<Regex, regex::Error> {
    let body = pattern
        .trim_end_matches('/')
        .split('/')
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                format!("(?P<{}>[^/]+)", name)
            } else if segment == "*" {
                "(?P<wildcard>.*)".to_string()
            } else {
                regex::escape(segment)
            }
        })
        .collect::<Vec<_>>()
        .join("/");

    Regex::new(&format!("(?i)^{}/?$", body))
}

fn fill_target(target: &str, caps: &Captures<'_>) -> String {
    target
        .split('/')
        .map(|segment| {
            let name = if segment == "*" {
                Some("wildcard")
            } else {
                segment.strip_prefix(':')
            };
            match name.and_then(|n| caps.name(n)) {
                Some(value) => value.as_str(),
                None => segment,
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
