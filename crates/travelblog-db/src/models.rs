//! Database row types — these map directly to SQLite rows.
//! Timestamps are RFC 3339 UTC strings with microsecond precision, so text
//! order matches chronological order.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use travelblog_types::models::{Destination, Message};

pub struct UserRow {
    pub id: String,
    pub username: String,
    /// Argon2 PHC string.
    pub password: String,
    pub created_at: String,
}

pub struct DestinationRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub img_src: String,
}

pub struct MessageRow {
    pub id: String,
    pub username: String,
    pub content: String,
    pub created_at: String,
}

/// Destination fields before an id is assigned.
#[derive(Debug, Clone, Copy)]
pub struct NewDestination<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub img_src: &'a str,
}

impl DestinationRow {
    pub fn into_destination(self) -> Result<Destination> {
        Ok(Destination {
            id: parse_id(&self.id)?,
            title: self.title,
            description: self.description,
            img_src: self.img_src,
        })
    }
}

impl MessageRow {
    pub fn into_message(self) -> Result<Message> {
        Ok(Message {
            id: parse_id(&self.id)?,
            created_at: parse_timestamp(&self.created_at)?,
            username: self.username,
            content: self.content,
        })
    }
}

pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

fn parse_id(raw: &str) -> Result<Uuid> {
    raw.parse().with_context(|| format!("Corrupt id '{}'", raw))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .with_context(|| format!("Corrupt created_at '{}'", raw))
}
