//! Route-data table.
//!
//! An ordered tree of path patterns. Each node may carry `RouteMetadata`
//! (translation keys for title and description), a redirect target, and
//! children. Resolution walks the tree first-match-first and reports the
//! deepest matched node, which is the node whose metadata drives the head.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Translation keys attached to a leaf route.
///
/// A `None` key means the corresponding head field is left as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMetadata {
    #[serde(default)]
    pub title_key: Option<String>,
    #[serde(default)]
    pub description_key: Option<String>,
}

impl RouteMetadata {
    pub fn new(title_key: &str, description_key: &str) -> Self {
        Self {
            title_key: Some(title_key.to_string()),
            description_key: Some(description_key.to_string()),
        }
    }
}

/// One node of the route tree.
///
/// `path` holds zero or more `/`-separated segments; a segment starting with
/// `:` captures a parameter. A node with children matches a prefix and hands
/// the rest to its children; a node without children must consume the whole
/// remaining path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteNode {
    pub path: String,
    #[serde(default)]
    pub data: Option<RouteMetadata>,
    #[serde(default)]
    pub redirect_to: Option<String>,
    #[serde(default)]
    pub children: Vec<RouteNode>,
}

impl RouteNode {
    /// A page carrying title and description keys.
    pub fn page(path: &str, title_key: &str, description_key: &str) -> Self {
        Self {
            path: path.to_string(),
            data: Some(RouteMetadata::new(title_key, description_key)),
            redirect_to: None,
            children: Vec::new(),
        }
    }

    /// A page without metadata; the previous title and description stay.
    pub fn bare(path: &str) -> Self {
        Self {
            path: path.to_string(),
            data: None,
            redirect_to: None,
            children: Vec::new(),
        }
    }

    /// A redirect entry. `:name` segments in `target` are filled from the
    /// parameters captured by `path`.
    pub fn redirect(path: &str, target: &str) -> Self {
        Self {
            path: path.to_string(),
            data: None,
            redirect_to: Some(target.to_string()),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<RouteNode>) -> Self {
        self.children = children;
        self
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }
}

/// A fully resolved page route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub params: HashMap<String, String>,
    pub metadata: RouteMetadata,
}

impl ResolvedRoute {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch {
    Page(ResolvedRoute),
    Redirect(String),
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteNode>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteNode>) -> Self {
        Self { routes }
    }

    /// The site's routing: every page lives under a `:lang` prefix.
    pub fn site() -> Self {
        Self::new(vec![
            RouteNode::redirect("en/blogs", "/ar/blogs"),
            RouteNode::redirect("en/blogs/:id", "/ar/blogs/:id"),
            RouteNode::bare(":lang").with_children(vec![
                RouteNode::page("", "home.title", "home.title-desc"),
                RouteNode::page("projects", "projects.title", "projects.title-desc"),
                RouteNode::bare("projects-details/:id"),
                RouteNode::page("services", "services.title", "services.title-desc"),
                RouteNode::bare("services-details/:id"),
                RouteNode::page("about-us", "about-us.title", "about-us.title-desc"),
                RouteNode::page("contact-us", "contact-us.title", "contact-us.title-desc"),
                RouteNode::bare("blogs").with_children(vec![
                    RouteNode::page("", "contact-us.blogs", "contact-us.blogs-desc"),
                    RouteNode::page(":id", "contact-us.blogs", "contact-us.blogs-desc"),
                ]),
                RouteNode::page(
                    "privacy-policy",
                    "privacy-policy.title",
                    "privacy-policy.title-desc",
                ),
            ]),
        ])
    }

    /// Parse a JSON array of route nodes (`path`, `data.titleKey`,
    /// `data.descriptionKey`, `redirectTo`, `children`).
    pub fn from_json(raw: &str) -> Result<Self> {
        let routes: Vec<RouteNode> =
            serde_json::from_str(raw).context("Invalid route table JSON")?;
        Ok(Self::new(routes))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read route table {}", path.display()))?;
        Self::from_json(&raw)
    }

    /// Resolve a request path. Query string and fragment are ignored.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let mut params = HashMap::new();
        let chain = match_nodes(&self.routes, &segments, &mut params)?;
        let leaf = chain.last()?;

        if let Some(target) = &leaf.redirect_to {
            return Some(RouteMatch::Redirect(fill_params(target, &params)));
        }

        Some(RouteMatch::Page(ResolvedRoute {
            metadata: leaf.data.clone().unwrap_or_default(),
            params,
        }))
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::site()
    }
}

fn match_nodes<'a>(
    nodes: &'a [RouteNode],
    segments: &[&str],
    params: &mut HashMap<String, String>,
) -> Option<Vec<&'a RouteNode>> {
    for node in nodes {
        let mut captured = params.clone();
        let Some(rest) = match_prefix(node, segments, &mut captured) else {
            continue;
        };

        if node.children.is_empty() {
            if rest.is_empty() {
                *params = captured;
                return Some(vec![node]);
            }
            continue;
        }

        if let Some(mut chain) = match_nodes(&node.children, rest, &mut captured) {
            *params = captured;
            chain.insert(0, node);
            return Some(chain);
        }
    }
    None
}

/// Match the node's own segments against the front of `segments`, returning
/// what is left.
fn match_prefix<'s>(
    node: &RouteNode,
    segments: &'s [&'s str],
    params: &mut HashMap<String, String>,
) -> Option<&'s [&'s str]> {
    let mut consumed = 0;
    for pattern in node.segments() {
        let actual = segments.get(consumed)?;
        match pattern.strip_prefix(':') {
            Some(name) => {
                params.insert(name.to_string(), (*actual).to_string());
            }
            None if pattern == *actual => {}
            None => return None,
        }
        consumed += 1;
    }
    Some(&segments[consumed..])
}

fn fill_params(target: &str, params: &HashMap<String, String>) -> String {
    target
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => params.get(name).map(String::as_str).unwrap_or(segment),
            None => segment,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(table: &RouteTable, path: &str) -> ResolvedRoute {
        match table.resolve(path) {
            Some(RouteMatch::Page(route)) => route,
            other => panic!("expected page for {}, got {:?}", path, other),
        }
    }

    // ==================== Page Resolution Tests ====================

    #[test]
    fn test_home_resolves_to_empty_child() {
        let route = page(&RouteTable::site(), "/ar");
        assert_eq!(route.param("lang"), Some("ar"));
        assert_eq!(route.metadata, RouteMetadata::new("home.title", "home.title-desc"));
    }

    #[test]
    fn test_trailing_slash_and_query_ignored() {
        let route = page(&RouteTable::site(), "/en/projects/?page=2");
        assert_eq!(route.param("lang"), Some("en"));
        assert_eq!(route.metadata.title_key.as_deref(), Some("projects.title"));
    }

    #[test]
    fn test_detail_route_has_no_metadata() {
        let route = page(&RouteTable::site(), "/ar/services-details/42");
        assert_eq!(route.param("id"), Some("42"));
        assert_eq!(route.metadata, RouteMetadata::default());
    }

    #[test]
    fn test_nested_blog_route_uses_deepest_metadata() {
        let route = page(&RouteTable::site(), "/en/blogs/7");
        assert_eq!(route.param("id"), Some("7"));
        assert_eq!(route.metadata.title_key.as_deref(), Some("contact-us.blogs"));

        let listing = page(&RouteTable::site(), "/ar/blogs");
        assert!(listing.params.get("id").is_none());
        assert_eq!(listing.param("lang"), Some("ar"));
        assert_eq!(listing.metadata.title_key.as_deref(), Some("contact-us.blogs"));
    }

    #[test]
    fn test_lang_param_is_not_validated_by_table() {
        let route = page(&RouteTable::site(), "/fr/about-us");
        assert_eq!(route.param("lang"), Some("fr"));
    }

    // ==================== No-match Tests ====================

    #[test]
    fn test_unknown_page_does_not_match() {
        assert_eq!(RouteTable::site().resolve("/ar/unknown-page"), None);
        assert_eq!(RouteTable::site().resolve("/fr/anything"), None);
    }

    #[test]
    fn test_extra_segments_do_not_match() {
        assert_eq!(RouteTable::site().resolve("/ar/about-us/extra"), None);
        assert_eq!(RouteTable::site().resolve("/ar/blogs/1/2"), None);
    }

    #[test]
    fn test_root_does_not_match() {
        assert_eq!(RouteTable::site().resolve("/"), None);
    }

    // ==================== Redirect Entry Tests ====================

    #[test]
    fn test_english_blogs_redirect_to_arabic() {
        let table = RouteTable::site();
        assert_eq!(
            table.resolve("/en/blogs"),
            Some(RouteMatch::Redirect("/ar/blogs".to_string()))
        );
        assert_eq!(
            table.resolve("/en/blogs/15"),
            Some(RouteMatch::Redirect("/ar/blogs/15".to_string()))
        );
    }

    // ==================== JSON Loading Tests ====================

    #[test]
    fn test_from_json() {
        let table = RouteTable::from_json(
            r#"[
                {"path": "old", "redirectTo": "/ar"},
                {"path": ":lang", "children": [
                    {"path": "", "data": {"titleKey": "home.title"}}
                ]}
            ]"#,
        )
        .expect("valid table");

        assert_eq!(table.resolve("/old"), Some(RouteMatch::Redirect("/ar".to_string())));
        let route = page(&table, "/en");
        assert_eq!(route.metadata.title_key.as_deref(), Some("home.title"));
        assert_eq!(route.metadata.description_key, None);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(RouteTable::from_json("{}").is_err());
    }

    #[test]
    fn test_fill_params_keeps_unknown_placeholders() {
        let params = HashMap::from([("id".to_string(), "9".to_string())]);
        assert_eq!(fill_params("/ar/blogs/:id", &params), "/ar/blogs/9");
        assert_eq!(fill_params("/ar/:slug", &params), "/ar/:slug");
    }
}
