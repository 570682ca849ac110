use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,

    // Site
    pub site_base_url: String,
    pub environment: Option<String>,

    // Files
    pub browser_dist_folder: PathBuf,
    pub i18n_dir: PathBuf,
    pub routes_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let browser_dist_folder = PathBuf::from(
            std::env::var("BROWSER_DIST_FOLDER").unwrap_or_else(|_| "dist/browser".to_string()),
        );

        Ok(Self {
            // Server
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: match std::env::var("PORT") {
                Ok(v) => v
                    .parse()
                    .with_context(|| format!("PORT must be a valid port number, got '{}'", v))?,
                Err(_) => 6000,
            },

            // Site - canonical links are built as "{base}/{lang}{slug}"
            site_base_url: std::env::var("SITE_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "https://fpico.org".to_string()),
            environment: std::env::var("APP_ENV").ok().filter(|v| !v.is_empty()),

            // Files
            i18n_dir: std::env::var("I18N_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| browser_dist_folder.join("assets").join("i18n")),
            routes_file: std::env::var("ROUTES_FILE").ok().map(PathBuf::from),
            browser_dist_folder,
        })
    }

    /// Listener address as a (host, port) pair; IPv6 hosts need no brackets.
    pub fn bind_address(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}
