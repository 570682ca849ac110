//! Internationalization (i18n) module for the bilingual site.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the supported languages
//! - `language`: Validated `Language` type built from the registry
//! - `state`: Reactive active-language cell (single writer, many readers)
//! - `catalog`: `Translator` lookup trait and the JSON-backed `Catalog`
//!
//! # Example
//!
//! ```rust,ignore
//! use fpico_web::i18n::{Language, LanguageState};
//!
//! let state = LanguageState::default();
//! state.set(Language::from_code("en")?);
//! assert_eq!(Language::ENGLISH.others(), vec![Language::ARABIC]);
//! ```

mod catalog;
mod language;
mod registry;
mod state;

pub use catalog::{Catalog, Translator};
pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry, TextDirection};
pub use state::LanguageState;
