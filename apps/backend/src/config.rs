//! Service configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use crate::services::sessions::DEFAULT_SESSION_TTL;

/// Where the card repository loads flashcards from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardSource {
    Postgres { url: String },
    Directory(PathBuf),
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub card_source: CardSource,
    pub session_ttl: Duration,
}

impl Config {
    /// Read configuration from process environment (after loading `.env`).
    ///
    /// - HOST: bind address (default 0.0.0.0)
    /// - PORT: listen port (default 3000)
    /// - DATABASE_URL: use PostgreSQL as the card repository
    /// - CARDS_DIR: markdown deck directory when no database is set (default ./cards)
    /// - SESSION_TTL_SECS: idle seconds before a session is evicted (default 7200)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {:?}", raw))?,
            None => 3000,
        };

        let card_source = match lookup("DATABASE_URL").filter(|url| !url.is_empty()) {
            Some(url) => CardSource::Postgres { url },
            None => CardSource::Directory(PathBuf::from(
                lookup("CARDS_DIR").unwrap_or_else(|| "./cards".to_string()),
            )),
        };

        let session_ttl = match lookup("SESSION_TTL_SECS") {
            Some(raw) => Duration::from_secs(raw.parse::<u64>().with_context(|| {
                format!("SESSION_TTL_SECS must be a number of seconds, got {:?}", raw)
            })?),
            None => DEFAULT_SESSION_TTL,
        };

        Ok(Self {
            host,
            port,
            card_source,
            session_ttl,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
