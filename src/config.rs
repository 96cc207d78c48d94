//! Startup configuration.
//!
//! Built-in defaults, overridden by an optional TOML file, overridden by
//! command-line flags.  The result is resolved once in `main` and never
//! changes afterwards.
//!
//! ```toml
//! browser = "firefox"
//!
//! [feed]
//! feed_id = "meraki_noen"
//! proxy_template = "https://api.allorigins.win/raw?url={url}"
//! proxy_format = "raw"
//! timeout_seconds = 5
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use serde::Deserialize;
use url::Url;

use crate::error::{FeedError, Result};
use crate::source::{FeedSource, ProxyFormat, URL_TOKEN};

pub const DEFAULT_FEED_ID: &str = "meraki_noen";
pub const DEFAULT_LOG_FILE: &str = "note-feed.log";

#[cfg(target_os = "macos")]
pub const DEFAULT_BROWSER: &str = "open";
#[cfg(not(target_os = "macos"))]
pub const DEFAULT_BROWSER: &str = "xdg-open";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProxyFormatArg {
    Raw,
    Json,
}

impl From<ProxyFormatArg> for ProxyFormat {
    fn from(arg: ProxyFormatArg) -> Self {
        match arg {
            ProxyFormatArg::Raw => ProxyFormat::Raw,
            ProxyFormatArg::Json => ProxyFormat::JsonEnvelope,
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "note-feed")]
#[command(about = "Show the latest articles of a feed as cards in the terminal")]
pub struct Cli {
    /// TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Feed identifier substituted into the feed URL
    #[arg(long)]
    pub feed_id: Option<String>,

    /// Proxy URL template; `{url}` is replaced by the encoded feed URL
    #[arg(long)]
    pub proxy: Option<String>,

    #[arg(long, value_enum)]
    pub proxy_format: Option<ProxyFormatArg>,

    /// Where log output goes (the terminal is taken by the UI)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// On-disk layout.  Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub browser: Option<String>,
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub feed: FeedTable,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedTable {
    pub feed_id: Option<String>,
    pub feed_url_template: Option<String>,
    pub profile_url_template: Option<String>,
    pub proxy_template: Option<String>,
    pub proxy_format: Option<ProxyFormat>,
    pub cache_bust: Option<bool>,
    pub timeout_seconds: Option<u64>,
    pub placeholder_image: Option<String>,
    pub idle_motion: Option<bool>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source: FeedSource,
    /// Command used to open a card's link.
    pub browser: String,
    pub log_file: PathBuf,
    pub verbose: bool,
}

impl Settings {
    /// Load the config file named by `cli` (if any) and layer the flags on top.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::from_path(path)?,
            None => FileConfig::default(),
        };
        let settings = Self::resolve(cli, file);
        settings.validate()?;
        Ok(settings)
    }

    fn resolve(cli: &Cli, file: FileConfig) -> Self {
        let feed = file.feed;
        let feed_id = cli
            .feed_id
            .clone()
            .or(feed.feed_id)
            .unwrap_or_else(|| DEFAULT_FEED_ID.to_string());

        let mut source = FeedSource::new(feed_id);
        if let Some(template) = feed.feed_url_template {
            source.feed_url_template = template;
        }
        if let Some(template) = feed.profile_url_template {
            source.profile_url_template = template;
        }
        if let Some(proxy) = cli.proxy.clone().or(feed.proxy_template) {
            source.proxy_template = proxy;
        }
        if let Some(format) = cli.proxy_format.map(ProxyFormat::from).or(feed.proxy_format) {
            source.proxy_format = format;
        }
        if let Some(cache_bust) = feed.cache_bust {
            source.cache_bust = cache_bust;
        }
        if let Some(secs) = feed.timeout_seconds {
            source.timeout = Duration::from_secs(secs);
        }
        if let Some(image) = feed.placeholder_image {
            source.placeholder_image = image;
        }
        if let Some(idle) = feed.idle_motion {
            source.idle_motion = idle;
        }

        Self {
            source,
            browser: file.browser.unwrap_or_else(|| DEFAULT_BROWSER.to_string()),
            log_file: cli
                .log_file
                .clone()
                .or(file.log_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            verbose: cli.verbose,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let source = &self.source;
        if source.feed_id.trim().is_empty() {
            return Err(FeedError::config("feed_id cannot be empty"));
        }
        if !source.proxy_template.contains(URL_TOKEN) {
            return Err(FeedError::config(format!(
                "proxy template {:?} has no {URL_TOKEN} placeholder",
                source.proxy_template
            )));
        }
        validate_http_url("proxy_template", &source.proxy_url(0))?;
        validate_http_url("feed_url_template", &source.feed_url(0))?;
        validate_http_url("profile_url_template", &source.profile_url())?;
        if source.timeout < Duration::from_secs(1) {
            return Err(FeedError::config("timeout_seconds must be at least 1"));
        }
        if source.placeholder_image.trim().is_empty() {
            return Err(FeedError::config("placeholder_image cannot be empty"));
        }
        if self.browser.trim().is_empty() {
            return Err(FeedError::config("browser cannot be empty"));
        }
        Ok(())
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| FeedError::config(format!("{field}: invalid URL {value:?}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(FeedError::config(format!(
            "{field}: unsupported URL scheme {scheme:?}"
        ))),
    }
}
