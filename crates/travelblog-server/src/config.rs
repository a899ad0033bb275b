use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug)]
pub struct Config {
    /// Hostname or IP; resolved when the listener binds.
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = get("TRAVEL_BLOG_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match get("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("Invalid PORT value '{}'", raw))?,
            None => {
                info!("PORT not set, using default: {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };
        let db_path = get("TRAVEL_BLOG_DB_PATH")
            .unwrap_or_else(|| "travel_blog.db".into())
            .into();

        Ok(Self { host, port, db_path })
    }
}
