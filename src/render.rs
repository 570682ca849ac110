//! Render-on-request engine.
//!
//! The server hands every path that survives the redirect rules to a
//! `RenderEngine`. The contract is narrow: render something, report no match,
//! or fail. `ShellRenderer` is the bundled engine; it resolves the route table
//! and emits an HTML shell whose head went through the metadata synchronizer.

use crate::i18n::Language;
use crate::routes::{RouteMatch, RouteTable};
use crate::seo::head::{HeadElement, InMemoryHead};
use crate::seo::sync::{MetadataSynchronizer, RouteSnapshot};
use futures::future::BoxFuture;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Path of the page to render, without query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub path: String,
}

impl RenderRequest {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Page { html: String, language: Language },
    /// The route table points elsewhere; served as a permanent redirect.
    Redirect(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Render engine failed: {0}")]
    Engine(String),

    #[error("Render engine panicked while handling {0}")]
    Panicked(String),
}

pub trait RenderEngine: Send + Sync {
    /// `Ok(None)` means no route matched.
    fn handle<'a>(
        &'a self,
        request: &'a RenderRequest,
    ) -> BoxFuture<'a, Result<Option<Rendered>, RenderError>>;
}

/// Static parts of every rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageShell {
    /// Initial head; must contain a title for link placement.
    pub head: Vec<HeadElement>,
    pub body: String,
}

impl Default for PageShell {
    fn default() -> Self {
        Self {
            head: vec![
                HeadElement::Raw(r#"<meta charset="utf-8">"#.to_string()),
                HeadElement::Title("FPICO".to_string()),
                HeadElement::Raw(r#"<base href="/">"#.to_string()),
                HeadElement::Raw(
                    r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#
                        .to_string(),
                ),
            ],
            body: "<app-root></app-root>".to_string(),
        }
    }
}

pub struct ShellRenderer {
    routes: Arc<RouteTable>,
    synchronizer: Arc<MetadataSynchronizer>,
    shell: PageShell,
}

impl ShellRenderer {
    pub fn new(routes: Arc<RouteTable>, synchronizer: Arc<MetadataSynchronizer>) -> Self {
        Self {
            routes,
            synchronizer,
            shell: PageShell::default(),
        }
    }

    pub fn with_shell(mut self, shell: PageShell) -> Self {
        self.shell = shell;
        self
    }

    pub async fn render(&self, request: &RenderRequest) -> Result<Option<Rendered>, RenderError> {
        let route = match self.routes.resolve(&request.path) {
            Some(RouteMatch::Page(route)) => route,
            Some(RouteMatch::Redirect(target)) => return Ok(Some(Rendered::Redirect(target))),
            None => return Ok(None),
        };

        // Tables without a :lang segment render in the default language.
        let language = match route.param("lang") {
            Some(code) => match Language::from_code(code) {
                Ok(language) => language,
                Err(e) => {
                    debug!("No page for {}: {}", request.path, e);
                    return Ok(None);
                }
            },
            None => Language::default_language(),
        };

        let mut head = InMemoryHead::new(self.shell.head.clone());
        let snapshot = RouteSnapshot::new(&request.path, route.metadata);
        self.synchronizer.resync(&mut head, &snapshot, language).await;

        Ok(Some(Rendered::Page {
            html: self.document(&head),
            language,
        }))
    }

    fn document(&self, head: &InMemoryHead) -> String {
        let lang = head.lang().unwrap_or_default();
        let dir = head.dir().map(|d| d.as_str()).unwrap_or("ltr");
        format!(
            "<!doctype html>\n<html lang=\"{}\" dir=\"{}\">\n<head>\n{}\n</head>\n<body>\n{}\n</body>\n</html>\n",
            lang,
            dir,
            head.to_html(),
            self.shell.body
        )
    }
}

impl RenderEngine for ShellRenderer {
    fn handle<'a>(
        &'a self,
        request: &'a RenderRequest,
    ) -> BoxFuture<'a, Result<Option<Rendered>, RenderError>> {
        Box::pin(self.render(request))
    }
}
