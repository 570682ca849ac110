//! Event loop that owns the document head.
//!
//! Two independent sources trigger a full resync: navigation completing (a new
//! `RouteSnapshot` on the channel) and the active language changing (the
//! `LanguageState` watch). The driver is the only writer of the head, so
//! rebuilds never interleave and no lock is needed.

use crate::i18n::Language;
use crate::seo::head::HeadDocument;
use crate::seo::sync::{MetadataSynchronizer, RouteSnapshot};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

pub struct MetadataDriver<H> {
    synchronizer: Arc<MetadataSynchronizer>,
    head: H,
    language: watch::Receiver<Language>,
    navigation: mpsc::Receiver<RouteSnapshot>,
    current: RouteSnapshot,
}

impl<H> MetadataDriver<H>
where
    H: HeadDocument + Send,
{
    pub fn new(
        synchronizer: Arc<MetadataSynchronizer>,
        head: H,
        language: watch::Receiver<Language>,
        navigation: mpsc::Receiver<RouteSnapshot>,
        initial: RouteSnapshot,
    ) -> Self {
        Self {
            synchronizer,
            head,
            language,
            navigation,
            current: initial,
        }
    }

    /// Resync once for the initial route, then on every event until the
    /// navigation channel closes. Returns the head in its final state.
    ///
    /// Language changes are drained before navigation events, so a language
    /// switch queued alongside a navigation is applied before the channel
    /// close ends the loop.
    pub async fn run(self) -> H {
        let MetadataDriver {
            synchronizer,
            mut head,
            mut language,
            mut navigation,
            mut current,
        } = self;

        let mut active = *language.borrow_and_update();
        synchronizer.resync(&mut head, &current, active).await;
        let mut resyncs = 1usize;
        let mut language_open = true;

        loop {
            tokio::select! {
                biased;

                changed = language.changed(), if language_open => {
                    if changed.is_err() {
                        debug!("Language state dropped, following navigation only");
                        language_open = false;
                        continue;
                    }
                    active = *language.borrow_and_update();
                    debug!("Language changed to {}, resyncing {}", active, current.path);
                }
                next = navigation.recv() => {
                    match next {
                        Some(route) => {
                            debug!("Navigation to {}", route.path);
                            current = route;
                        }
                        None => break,
                    }
                }
            }

            synchronizer.resync(&mut head, &current, active).await;
            resyncs += 1;
        }

        info!("Metadata driver stopped after {} resyncs", resyncs);
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Catalog, LanguageState};
    use crate::routes::{RouteMetadata, RouteTable};
    use crate::seo::head::{HeadElement, InMemoryHead, Selector};
    use serde_json::json;

    fn synchronizer() -> Arc<MetadataSynchronizer> {
        let catalog = Catalog::new()
            .with_language(
                Language::ARABIC,
                json!({"home": {"title": "الرئيسية"}, "services": {"title": "الخدمات"}}),
            )
            .with_language(
                Language::ENGLISH,
                json!({"home": {"title": "Home"}, "services": {"title": "Services"}}),
            );
        Arc::new(MetadataSynchronizer::new("https://fpico.org", Arc::new(catalog)))
    }

    fn head() -> InMemoryHead {
        InMemoryHead::new(vec![HeadElement::Title("FPICO".to_string())])
    }

    fn home() -> RouteSnapshot {
        RouteSnapshot::new("/ar", RouteMetadata::new("home.title", "home.title-desc"))
    }

    fn canonical(head: &InMemoryHead) -> Option<String> {
        head.find(&Selector::link_rel("canonical"))
            .first()
            .and_then(|e| match e {
                HeadElement::Link { href, .. } => Some(href.clone()),
                _ => None,
            })
    }

    #[tokio::test]
    async fn test_initial_resync_runs_without_events() {
        let state = LanguageState::default();
        let (tx, rx) = mpsc::channel(8);
        drop(tx);

        let head = MetadataDriver::new(synchronizer(), head(), state.subscribe(), rx, home())
            .run()
            .await;

        assert_eq!(head.title(), Some("الرئيسية"));
        assert_eq!(canonical(&head).as_deref(), Some("https://fpico.org/ar"));
    }

    #[tokio::test]
    async fn test_navigation_triggers_resync() {
        let state = LanguageState::default();
        let (tx, rx) = mpsc::channel(8);
        let table = RouteTable::site();

        tx.send(RouteSnapshot::resolve(&table, "/ar/services").expect("page"))
            .await
            .expect("driver alive");
        drop(tx);

        let head = MetadataDriver::new(synchronizer(), head(), state.subscribe(), rx, home())
            .run()
            .await;

        assert_eq!(head.title(), Some("الخدمات"));
        assert_eq!(canonical(&head).as_deref(), Some("https://fpico.org/ar/services"));
    }

    #[tokio::test]
    async fn test_language_change_triggers_resync() {
        let state = LanguageState::default();
        let (tx, rx) = mpsc::channel(8);
        let driver = MetadataDriver::new(synchronizer(), head(), state.subscribe(), rx, home());
        let handle = tokio::spawn(driver.run());

        state.set(Language::ENGLISH);
        tokio::task::yield_now().await;
        drop(tx);

        let head = handle.await.expect("driver task");
        assert_eq!(head.title(), Some("Home"));
        assert_eq!(head.meta("keywords"), None);
        assert_eq!(head.lang(), Some("en"));
        assert_eq!(canonical(&head).as_deref(), Some("https://fpico.org/en"));
    }

    #[tokio::test]
    async fn test_rapid_language_switching_keeps_single_link_set() {
        let state = LanguageState::default();
        let (tx, rx) = mpsc::channel(8);
        let driver = MetadataDriver::new(synchronizer(), head(), state.subscribe(), rx, home());
        let handle = tokio::spawn(driver.run());

        for i in 0..50 {
            let language = if i % 2 == 0 { Language::ENGLISH } else { Language::ARABIC };
            state.set(language);
            tokio::task::yield_now().await;
        }
        drop(tx);

        let head = handle.await.expect("driver task");
        assert_eq!(head.count(&Selector::link_rel("canonical")), 1);
        assert_eq!(head.count(&Selector::link_rel("alternate")), 3);
        assert_eq!(head.count(&Selector::JsonLd), 1);
        assert_eq!(head.lang(), Some("ar"));
    }

    #[tokio::test]
    async fn test_dropped_language_state_still_follows_navigation() {
        let state = LanguageState::default();
        let receiver = state.subscribe();
        drop(state);

        let (tx, rx) = mpsc::channel(8);
        tx.send(RouteSnapshot::new(
            "/ar/services",
            RouteMetadata::new("services.title", "services.title-desc"),
        ))
        .await
        .expect("driver alive");
        drop(tx);

        let head = MetadataDriver::new(synchronizer(), head(), receiver, rx, home())
            .run()
            .await;

        assert_eq!(head.title(), Some("الخدمات"));
    }
}
