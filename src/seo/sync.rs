//! Metadata synchronizer.
//!
//! Keeps the document head consistent with the current (route, language)
//! pair. Every call is a full resync: links and the JSON-LD block are cleared
//! and rebuilt, so repeated calls never accumulate nodes.

use crate::i18n::{Language, Translator};
use crate::routes::{RouteMatch, RouteMetadata, RouteTable};
use crate::seo::head::{HeadDocument, HeadElement, Selector};
use crate::seo::schema::BusinessProfile;
use crate::seo::urls::PageUrls;
use std::sync::Arc;
use tracing::debug;

/// Keywords meta content, emitted for Arabic pages only.
pub const ARABIC_KEYWORDS: &str = "فبيكو خدمات المقاولات";

/// Region suffix appended to language codes in `hreflang` values.
pub const HREFLANG_REGION: &str = "SR";

pub const HREFLANG_X_DEFAULT: &str = "x-default";

/// The active route as seen by the synchronizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteSnapshot {
    pub path: String,
    pub metadata: RouteMetadata,
}

impl RouteSnapshot {
    pub fn new(path: &str, metadata: RouteMetadata) -> Self {
        Self {
            path: path.to_string(),
            metadata,
        }
    }

    /// Resolve `path` through the route table. Redirect entries and unmatched
    /// paths have no snapshot.
    pub fn resolve(table: &RouteTable, path: &str) -> Option<Self> {
        match table.resolve(path)? {
            RouteMatch::Page(route) => Some(Self::new(path, route.metadata)),
            RouteMatch::Redirect(_) => None,
        }
    }
}

pub fn hreflang(language: Language) -> String {
    format!("{}-{}", language.code(), HREFLANG_REGION)
}

pub struct MetadataSynchronizer {
    base_url: String,
    translator: Arc<dyn Translator>,
    business: BusinessProfile,
}

impl MetadataSynchronizer {
    pub fn new(base_url: &str, translator: Arc<dyn Translator>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            translator,
            business: BusinessProfile::default(),
        }
    }

    /// Bring `head` in line with `route` rendered in `language`.
    ///
    /// Title and description are only written when their key is present and
    /// the lookup emits a value; otherwise the previous value stays.
    pub async fn resync<H>(&self, head: &mut H, route: &RouteSnapshot, language: Language)
    where
        H: HeadDocument + ?Sized,
    {
        debug!("Resyncing head for {} ({})", route.path, language);

        let title = self.translate(route.metadata.title_key.as_deref(), language);
        let description = self.translate(route.metadata.description_key.as_deref(), language);

        head.set_document_language(language.code(), language.direction());
        apply_keywords(head, language);
        self.rewrite_links(head, &route.path, language);

        let (title, description) = futures::join!(title, description);
        if let Some(title) = title {
            head.set_title(&title);
        }
        if let Some(description) = description {
            head.set_meta("description", &description);
        }
    }

    /// Replace every alternate/canonical link and the JSON-LD block.
    ///
    /// Each insert goes directly after `<title>`, so the document order ends
    /// up reversed: canonical, x-default, other-language alternates, JSON-LD,
    /// current-language alternate.
    pub fn rewrite_links<H>(&self, head: &mut H, path: &str, language: Language) -> PageUrls
    where
        H: HeadDocument + ?Sized,
    {
        head.clear(&Selector::link_rel("alternate"));
        head.clear(&Selector::link_rel("canonical"));
        head.clear(&Selector::JsonLd);

        let urls = PageUrls::derive(&self.base_url, path, language);

        let current = hreflang(language);
        head.insert_after_title(HeadElement::link(
            "alternate",
            Some(current.as_str()),
            &urls.canonical,
        ));
        head.insert_after_title(HeadElement::JsonLd(
            self.business.to_json_ld(&self.base_url, language),
        ));
        for (other, url) in &urls.alternates {
            let lang = hreflang(*other);
            head.insert_after_title(HeadElement::link("alternate", Some(lang.as_str()), url));
        }
        head.insert_after_title(HeadElement::link(
            "alternate",
            Some(HREFLANG_X_DEFAULT),
            &urls.x_default,
        ));
        head.insert_after_title(HeadElement::link("canonical", None, &urls.canonical));

        urls
    }

    async fn translate(&self, key: Option<&str>, language: Language) -> Option<String> {
        match key {
            Some(key) => self.translator.lookup(language, key).await,
            None => None,
        }
    }
}

fn apply_keywords<H>(head: &mut H, language: Language)
where
    H: HeadDocument + ?Sized,
{
    if language == Language::ARABIC {
        head.set_meta("keywords", ARABIC_KEYWORDS);
    } else {
        head.clear(&Selector::meta_name("keywords"));
    }
}
