//! Canonical and alternate URL derivation.

use crate::i18n::Language;

/// Strip a leading language segment from `path`.
///
/// Only a whole first segment naming a supported language is removed, so
/// `/archive` keeps its prefix. Query string, fragment and empty segments are
/// dropped, so `/ar/about-us/` and `/ar//about-us` share one slug. The site
/// root (with or without language) yields an empty slug.
pub fn clean_slug(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let mut segments = path.split('/').filter(|s| !s.is_empty()).peekable();

    if segments
        .peek()
        .is_some_and(|first| Language::from_code(first).is_ok())
    {
        segments.next();
    }

    segments.fold(String::new(), |mut slug, segment| {
        slug.push('/');
        slug.push_str(segment);
        slug
    })
}

/// `{base}/{lang}{slug}`
pub fn localized_url(base: &str, language: Language, slug: &str) -> String {
    format!("{}/{}{}", base, language.code(), slug)
}

/// Canonical and alternate URLs for one (path, language) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUrls {
    pub language: Language,
    pub canonical: String,
    /// One entry per other supported language, in registry order.
    pub alternates: Vec<(Language, String)>,
    /// The default-language canonical, used for `hreflang="x-default"`.
    pub x_default: String,
}

impl PageUrls {
    pub fn derive(base: &str, path: &str, language: Language) -> Self {
        let slug = clean_slug(path);
        Self {
            language,
            canonical: localized_url(base, language, &slug),
            alternates: language
                .others()
                .into_iter()
                .map(|other| (other, localized_url(base, other, &slug)))
                .collect(),
            x_default: localized_url(base, Language::default_language(), &slug),
        }
    }
}
