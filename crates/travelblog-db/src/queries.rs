use crate::models::{DestinationRow, MessageRow, NewDestination, UserRow, now_timestamp};
use crate::Database;
use anyhow::Result;
use rusqlite::{Connection, ErrorCode};
use uuid::Uuid;

impl Database {
    // -- Users --

    /// Insert a user unless the username is taken.
    /// Returns `None` on a username conflict; the UNIQUE constraint decides,
    /// so concurrent registrations cannot both succeed.
    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<Option<UserRow>> {
        let row = UserRow {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password: password_hash.to_string(),
            created_at: now_timestamp(),
        };

        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (id, username, password, created_at) VALUES (?1, ?2, ?3, ?4)",
                (&row.id, &row.username, &row.password, &row.created_at),
            );

            match inserted {
                Ok(_) => Ok(Some(row)),
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    // -- Destinations --

    pub fn count_destinations(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM destinations", [], |row| row.get(0))?;
            Ok(count as u64)
        })
    }

    /// Insert every destination in one transaction; either all land or none do.
    pub fn insert_destinations(&self, destinations: &[NewDestination<'_>]) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO destinations (id, title, description, img_src, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )?;
                for dest in destinations {
                    stmt.execute((
                        Uuid::new_v4().to_string(),
                        dest.title,
                        dest.description,
                        dest.img_src,
                        now_timestamp(),
                    ))?;
                }
            }
            tx.commit()?;
            Ok(destinations.len())
        })
    }

    pub fn list_destinations(&self) -> Result<Vec<DestinationRow>> {
        self.with_conn(query_destinations)
    }

    // -- Messages --

    pub fn insert_message(&self, username: &str, content: &str) -> Result<MessageRow> {
        let row = MessageRow {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            content: content.to_string(),
            created_at: now_timestamp(),
        };

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (id, username, content, created_at) VALUES (?1, ?2, ?3, ?4)",
                (&row.id, &row.username, &row.content, &row.created_at),
            )?;
            Ok(())
        })?;

        Ok(row)
    }

    /// All messages, oldest first. Insertion order breaks timestamp ties.
    pub fn list_messages(&self) -> Result<Vec<MessageRow>> {
        self.with_conn(query_messages)
    }

    /// Returns whether a row was removed. A missing id is not an error.
    pub fn delete_message(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM messages WHERE id = ?1", [id])?;
            Ok(removed > 0)
        })
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, username, password, created_at FROM users WHERE username = ?1")?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_destinations(conn: &Connection) -> Result<Vec<DestinationRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, description, img_src FROM destinations ORDER BY created_at, rowid",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(DestinationRow {
                id: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                img_src: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_messages(conn: &Connection) -> Result<Vec<MessageRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, content, created_at FROM messages ORDER BY created_at ASC, rowid ASC",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                username: row.get(1)?,
                content: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
