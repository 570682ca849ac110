//! Active-language cell shared between the language switcher and the
//! metadata driver.
//!
//! One writer (`set`), many readers (`subscribe`). Subscribers are woken only
//! when the language actually changes.

use crate::i18n::Language;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug)]
pub struct LanguageState {
    sender: watch::Sender<Language>,
}

impl LanguageState {
    pub fn new(initial: Language) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    pub fn current(&self) -> Language {
        *self.sender.borrow()
    }

    /// Switch the active language.
    ///
    /// Returns `true` if the value changed and subscribers were notified.
    pub fn set(&self, language: Language) -> bool {
        let changed = self.sender.send_if_modified(|current| {
            if *current == language {
                false
            } else {
                *current = language;
                true
            }
        });
        if changed {
            debug!("Active language changed to {}", language);
        }
        changed
    }

    pub fn subscribe(&self) -> watch::Receiver<Language> {
        self.sender.subscribe()
    }
}

impl Default for LanguageState {
    fn default() -> Self {
        Self::new(Language::default_language())
    }
}
