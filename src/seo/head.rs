//! Document head abstraction.
//!
//! The synchronizer talks to `HeadDocument` only. `InMemoryHead` is the
//! implementation used for server-side rendering and tests; it keeps the head
//! as an ordered element list and serializes it to HTML.

use crate::i18n::TextDirection;

/// An element that can live in the document head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadElement {
    Title(String),
    Meta {
        name: String,
        content: String,
    },
    Link {
        rel: String,
        hreflang: Option<String>,
        href: String,
    },
    /// `<script type="application/ld+json">` with a serialized JSON body.
    JsonLd(String),
    /// Pre-rendered markup from the page template (charset, viewport, styles).
    Raw(String),
}

impl HeadElement {
    pub fn link(rel: &str, hreflang: Option<&str>, href: &str) -> Self {
        HeadElement::Link {
            rel: rel.to_string(),
            hreflang: hreflang.map(str::to_string),
            href: href.to_string(),
        }
    }

    pub fn meta(name: &str, content: &str) -> Self {
        HeadElement::Meta {
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            HeadElement::Title(text) => format!("<title>{}</title>", escape_html(text)),
            HeadElement::Meta { name, content } => format!(
                r#"<meta name="{}" content="{}">"#,
                escape_html(name),
                escape_html(content)
            ),
            HeadElement::Link { rel, hreflang, href } => match hreflang {
                Some(lang) => format!(
                    r#"<link rel="{}" hreflang="{}" href="{}">"#,
                    escape_html(rel),
                    escape_html(lang),
                    escape_html(href)
                ),
                None => format!(
                    r#"<link rel="{}" href="{}">"#,
                    escape_html(rel),
                    escape_html(href)
                ),
            },
            HeadElement::JsonLd(body) => format!(
                r#"<script type="application/ld+json">{}</script>"#,
                body.replace("</", "<\\/")
            ),
            HeadElement::Raw(markup) => markup.clone(),
        }
    }
}

/// Which head elements an operation targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `link[rel="..."]`
    LinkRel(String),
    /// `meta[name="..."]`
    MetaName(String),
    /// `script[type="application/ld+json"]`
    JsonLd,
}

impl Selector {
    pub fn link_rel(rel: &str) -> Self {
        Selector::LinkRel(rel.to_string())
    }

    pub fn meta_name(name: &str) -> Self {
        Selector::MetaName(name.to_string())
    }

    pub fn matches(&self, element: &HeadElement) -> bool {
        match (self, element) {
            (Selector::LinkRel(want), HeadElement::Link { rel, .. }) => want == rel,
            (Selector::MetaName(want), HeadElement::Meta { name, .. }) => want == name,
            (Selector::JsonLd, HeadElement::JsonLd(_)) => true,
            _ => false,
        }
    }
}

/// Mutation surface of a document head.
pub trait HeadDocument {
    /// Remove every element matching `selector`; returns how many were removed.
    fn clear(&mut self, selector: &Selector) -> usize;

    /// Insert directly after the `<title>` element, or append when the head
    /// has no title.
    fn insert_after_title(&mut self, element: HeadElement);

    fn set_title(&mut self, title: &str);

    /// Create or update `meta[name]`. Never produces a duplicate.
    fn set_meta(&mut self, name: &str, content: &str);

    /// Set the `lang` and `dir` attributes of the document root.
    fn set_document_language(&mut self, lang: &str, dir: TextDirection);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryHead {
    elements: Vec<HeadElement>,
    lang: Option<String>,
    dir: Option<TextDirection>,
}

impl InMemoryHead {
    pub fn new(elements: Vec<HeadElement>) -> Self {
        Self {
            elements,
            lang: None,
            dir: None,
        }
    }

    pub fn elements(&self) -> &[HeadElement] {
        &self.elements
    }

    pub fn count(&self, selector: &Selector) -> usize {
        self.elements.iter().filter(|e| selector.matches(e)).count()
    }

    pub fn find(&self, selector: &Selector) -> Vec<&HeadElement> {
        self.elements.iter().filter(|e| selector.matches(e)).collect()
    }

    pub fn title(&self) -> Option<&str> {
        self.elements.iter().find_map(|e| match e {
            HeadElement::Title(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn meta(&self, name: &str) -> Option<&str> {
        self.elements.iter().find_map(|e| match e {
            HeadElement::Meta { name: n, content } if n == name => Some(content.as_str()),
            _ => None,
        })
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn dir(&self) -> Option<TextDirection> {
        self.dir
    }

    /// Inner HTML of `<head>`, one element per line.
    pub fn to_html(&self) -> String {
        self.elements
            .iter()
            .map(HeadElement::to_html)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for InMemoryHead {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl HeadDocument for InMemoryHead {
    fn clear(&mut self, selector: &Selector) -> usize {
        let before = self.elements.len();
        self.elements.retain(|e| !selector.matches(e));
        before - self.elements.len()
    }

    fn insert_after_title(&mut self, element: HeadElement) {
        let position = self
            .elements
            .iter()
            .position(|e| matches!(e, HeadElement::Title(_)));
        match position {
            Some(idx) => self.elements.insert(idx + 1, element),
            None => self.elements.push(element),
        }
    }

    fn set_title(&mut self, title: &str) {
        for element in &mut self.elements {
            if let HeadElement::Title(text) = element {
                *text = title.to_string();
                return;
            }
        }
        self.elements.insert(0, HeadElement::Title(title.to_string()));
    }

    fn set_meta(&mut self, name: &str, content: &str) {
        let mut found = false;
        self.elements.retain_mut(|e| match e {
            HeadElement::Meta { name: n, content: c } if n == name => {
                if found {
                    return false;
                }
                found = true;
                *c = content.to_string();
                true
            }
            _ => true,
        });
        if !found {
            self.elements.push(HeadElement::meta(name, content));
        }
    }

    fn set_document_language(&mut self, lang: &str, dir: TextDirection) {
        self.lang = Some(lang.to_string());
        self.dir = Some(dir);
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head_with_title() -> InMemoryHead {
        InMemoryHead::new(vec![
            HeadElement::Raw(r#"<meta charset="utf-8">"#.to_string()),
            HeadElement::Title("FPICO".to_string()),
            HeadElement::Raw(r#"<link rel="stylesheet" href="styles.css">"#.to_string()),
        ])
    }

    // ==================== Insertion Tests ====================

    #[test]
    fn test_insert_after_title_places_newest_first() {
        let mut head = head_with_title();
        head.insert_after_title(HeadElement::link("alternate", Some("ar-SR"), "a"));
        head.insert_after_title(HeadElement::link("canonical", None, "c"));

        assert_eq!(head.elements()[1], HeadElement::Title("FPICO".to_string()));
        assert_eq!(head.elements()[2], HeadElement::link("canonical", None, "c"));
        assert_eq!(head.elements()[3], HeadElement::link("alternate", Some("ar-SR"), "a"));
    }

    #[test]
    fn test_insert_without_title_appends() {
        let mut head = InMemoryHead::default();
        head.insert_after_title(HeadElement::JsonLd("{}".to_string()));
        head.insert_after_title(HeadElement::link("canonical", None, "c"));

        assert_eq!(head.elements().len(), 2);
        assert_eq!(head.elements()[0], HeadElement::JsonLd("{}".to_string()));
    }

    // ==================== Clear Tests ====================

    #[test]
    fn test_clear_removes_only_matching() {
        let mut head = head_with_title();
        head.insert_after_title(HeadElement::link("alternate", Some("ar-SR"), "a"));
        head.insert_after_title(HeadElement::link("alternate", Some("en-SR"), "b"));
        head.insert_after_title(HeadElement::link("canonical", None, "c"));

        assert_eq!(head.clear(&Selector::link_rel("alternate")), 2);
        assert_eq!(head.count(&Selector::link_rel("canonical")), 1);
        assert_eq!(head.clear(&Selector::link_rel("alternate")), 0);
        assert_eq!(head.elements().len(), 4);
    }

    #[test]
    fn test_raw_markup_is_never_selected() {
        let mut head = head_with_title();
        assert_eq!(head.clear(&Selector::link_rel("stylesheet")), 0);
        assert_eq!(head.clear(&Selector::JsonLd), 0);
    }

    // ==================== Title / Meta Tests ====================

    #[test]
    fn test_set_title_replaces_in_place() {
        let mut head = head_with_title();
        head.set_title("Home");
        assert_eq!(head.title(), Some("Home"));
        assert_eq!(head.elements()[1], HeadElement::Title("Home".to_string()));
    }

    #[test]
    fn test_set_title_creates_when_missing() {
        let mut head = InMemoryHead::default();
        head.set_title("Home");
        assert_eq!(head.elements(), &[HeadElement::Title("Home".to_string())]);
    }

    #[test]
    fn test_set_meta_is_idempotent() {
        let mut head = head_with_title();
        head.set_meta("keywords", "a");
        head.set_meta("keywords", "b");
        head.set_meta("keywords", "b");

        assert_eq!(head.count(&Selector::meta_name("keywords")), 1);
        assert_eq!(head.meta("keywords"), Some("b"));
    }

    #[test]
    fn test_set_meta_collapses_existing_duplicates() {
        let mut head = InMemoryHead::new(vec![
            HeadElement::meta("description", "one"),
            HeadElement::meta("description", "two"),
        ]);
        head.set_meta("description", "three");
        assert_eq!(head.elements(), &[HeadElement::meta("description", "three")]);
    }

    #[test]
    fn test_set_document_language() {
        let mut head = InMemoryHead::default();
        head.set_document_language("ar", TextDirection::Rtl);
        assert_eq!(head.lang(), Some("ar"));
        assert_eq!(head.dir(), Some(TextDirection::Rtl));
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn test_to_html_escapes_attributes() {
        let element = HeadElement::meta("description", r#"Build "better" <now> & later"#);
        assert_eq!(
            element.to_html(),
            r#"<meta name="description" content="Build &quot;better&quot; &lt;now&gt; &amp; later">"#
        );
    }

    #[test]
    fn test_to_html_link_with_hreflang() {
        let element = HeadElement::link("alternate", Some("x-default"), "https://fpico.org/ar");
        assert_eq!(
            element.to_html(),
            r#"<link rel="alternate" hreflang="x-default" href="https://fpico.org/ar">"#
        );
    }

    #[test]
    fn test_json_ld_cannot_close_script() {
        let element = HeadElement::JsonLd(r#"{"name":"</script><b>"}"#.to_string());
        let html = element.to_html();
        assert!(!html.contains("</script><b>"));
        assert!(html.ends_with("</script>"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<>&\"'"), "&lt;&gt;&amp;&quot;&#x27;");
        assert_eq!(escape_html("فبيكو"), "فبيكو");
        assert_eq!(escape_html(""), "");
    }
}
