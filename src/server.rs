//! HTTP delivery tier.
//!
//! Request flow: health endpoint → redirect rules → static files →
//! asset-not-found funnel → render engine. Every "not found" outcome becomes a
//! permanent redirect to the default-language root; no 404 is ever produced.

use crate::config::Config;
use crate::i18n::Catalog;
use crate::redirect::{default_root, is_api_path, is_static_asset, Decision, RedirectNormalizer};
use crate::render::{RenderEngine, RenderError, RenderRequest, Rendered, ShellRenderer};
use crate::routes::RouteTable;
use crate::seo::MetadataSynchronizer;
use anyhow::{Context, Result};
use axum::extract::{Request, State};
use axum::handler::Handler;
use axum::http::{header, Method, StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Facts reported by the health endpoint.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub browser_path: PathBuf,
    pub environment: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub normalizer: Arc<RedirectNormalizer>,
    pub engine: Arc<dyn RenderEngine>,
    pub info: Arc<ServerInfo>,
}

impl AppState {
    /// Wire the bundled components from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = Catalog::load_dir(&config.i18n_dir)?;

        let routes = match &config.routes_file {
            Some(path) => {
                info!("Loading route table from {}", path.display());
                RouteTable::load(path)?
            }
            None => RouteTable::site(),
        };

        let synchronizer = MetadataSynchronizer::new(&config.site_base_url, Arc::new(catalog));
        let engine = ShellRenderer::new(Arc::new(routes), Arc::new(synchronizer));

        Ok(Self {
            normalizer: Arc::new(RedirectNormalizer::site()?),
            engine: Arc::new(engine),
            info: Arc::new(ServerInfo {
                browser_path: config.browser_dist_folder.clone(),
                environment: config.environment.clone(),
            }),
        })
    }
}

pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let render = render_fallback.with_state(state.clone());
    let static_files = ServeDir::new(static_dir)
        .append_index_html_on_directories(false)
        .call_fallback_on_method_not_allowed(true)
        .fallback(render);

    Router::new()
        .route("/api/test", get(api_test))
        .fallback_service(static_files)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            normalize_redirects,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind, log the startup banner and serve until Ctrl-C.
pub async fn run(config: Config) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let router = build_router(state, &config.browser_dist_folder);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    let address = listener.local_addr().context("Failed to read bound address")?;

    info!("🚀 Site server started");
    info!("Environment   : {}", config.environment.as_deref().unwrap_or("undefined"));
    info!("Base URL      : {}", config.site_base_url);
    info!("Browser dist  : {}", config.browser_dist_folder.display());
    info!("Listening on  : http://{}", address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}

pub fn permanent_redirect(target: &str) -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, target.to_string())],
    )
        .into_response()
}

fn is_read(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD
}

async fn normalize_redirects(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if !is_read(request.method()) || is_api_path(path) {
        return next.run(request).await;
    }

    match state.normalizer.classify(path) {
        Decision::Redirect { target, .. } => permanent_redirect(&target),
        Decision::Serve => next.run(request).await,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    message: &'static str,
    browser_path: String,
    current_dir: String,
    environment: Option<String>,
}

async fn api_test(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Server is running",
        browser_path: state.info.browser_path.display().to_string(),
        current_dir: std::env::current_dir()
            .map(|dir| dir.display().to_string())
            .unwrap_or_default(),
        environment: state.info.environment.clone(),
    })
}

/// Reached only when no static file matched.
async fn render_fallback(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if !is_read(&method) {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let root = default_root();
    let path = uri.path();

    if is_static_asset(path) {
        warn!("❌ Static file not found: {}, permanent redirect → {}", path, root);
        return permanent_redirect(&root);
    }

    info!("SSR: {}", uri);
    let request = RenderRequest::new(path);

    let outcome = AssertUnwindSafe(state.engine.handle(&request))
        .catch_unwind()
        .await
        .unwrap_or_else(|_| Err(RenderError::Panicked(request.path.clone())));

    match outcome {
        Ok(Some(Rendered::Page { html, .. })) => Html(html).into_response(),
        Ok(Some(Rendered::Redirect(target))) => {
            info!("🔄 Route redirect: {} → {}", path, target);
            permanent_redirect(&target)
        }
        Ok(None) => {
            info!("🔄 Route not found: {}, permanent redirect → {}", path, root);
            permanent_redirect(&root)
        }
        Err(e) => {
            error!("SSR Error for {}: {}", path, e);
            permanent_redirect(&root)
        }
    }
}
