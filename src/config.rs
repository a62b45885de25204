use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::rss::ChannelMeta;
use crate::sync::SyncPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub feed: FeedConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    pub url: String,
    /// Keep the previous generation when a successful fetch yields no records.
    #[serde(default)]
    pub keep_stale_on_empty: bool,
    /// Re-sync period for the long-running mode. Unset means sync once and exit.
    pub refresh_interval_s: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    #[serde(default = "default_site_title")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_site_url")]
    pub url: String,
}

fn default_site_title() -> String {
    "site-feed".to_string()
}

fn default_site_url() -> String {
    "http://localhost".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_site_title(),
            description: String::new(),
            url: default_site_url(),
        }
    }
}

impl FeedConfig {
    pub fn policy(&self) -> SyncPolicy {
        SyncPolicy {
            keep_stale_on_empty: self.keep_stale_on_empty,
        }
    }
}

impl SiteConfig {
    pub fn channel(&self) -> ChannelMeta {
        ChannelMeta {
            title: self.title.clone(),
            description: self.description.clone(),
            link: self.url.clone(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config TOML")?;
        url::Url::parse(&config.feed.url)
            .with_context(|| format!("feed.url is not a valid URL: {}", config.feed.url))?;
        Ok(config)
    }
}
