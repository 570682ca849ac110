//! Translation lookup.
//!
//! The metadata synchronizer only sees the `Translator` trait. `Catalog` is
//! the bundled implementation backed by one JSON tree per language, keyed by
//! dotted paths (`home.title` resolves `{"home": {"title": "..."}}`).

use crate::i18n::Language;
use anyhow::{Context, Result};
use futures::future::{self, BoxFuture};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Keyed translation lookup.
///
/// `None` means "no emission": the caller leaves whatever it would have
/// written untouched.
pub trait Translator: Send + Sync {
    fn lookup<'a>(&'a self, language: Language, key: &'a str) -> BoxFuture<'a, Option<String>>;
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    trees: HashMap<Language, Value>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the tree for one language.
    pub fn with_language(mut self, language: Language, tree: Value) -> Self {
        self.trees.insert(language, tree);
        self
    }

    /// Load `<dir>/<code>.json` for every enabled language.
    ///
    /// A missing file leaves that language empty (every lookup misses) and is
    /// logged. A file that exists but is not valid JSON is an error.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut catalog = Catalog::new();

        for language in Language::all() {
            let path = dir.join(format!("{}.json", language.code()));
            if !path.exists() {
                warn!(
                    "No translation file for '{}' at {}, lookups will miss",
                    language,
                    path.display()
                );
                continue;
            }

            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let tree: Value = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?;

            info!("Loaded translations for '{}' from {}", language, path.display());
            catalog.trees.insert(language, tree);
        }

        Ok(catalog)
    }

    /// Synchronous dotted-path lookup. Non-string leaves are misses.
    pub fn get(&self, language: Language, key: &str) -> Option<&str> {
        let mut current = self.trees.get(&language)?;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        current.as_str()
    }
}

impl Translator for Catalog {
    fn lookup<'a>(&'a self, language: Language, key: &'a str) -> BoxFuture<'a, Option<String>> {
        let found = self.get(language, key).map(str::to_string);
        if found.is_none() {
            debug!("Translation miss for '{}' in '{}'", key, language);
        }
        Box::pin(future::ready(found))
    }
}
