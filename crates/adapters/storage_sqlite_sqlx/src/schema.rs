//! Table definitions.
//!
//! Column names, nullability and foreign keys match the data files written by
//! earlier versions of the service, so those files open unchanged. Tables are
//! created only when absent; no other migration is performed.

use sqlx::SqlitePool;

pub const CREATE_USERS: &str = r"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL
    )
";

pub const CREATE_EVENTS: &str = r"
    CREATE TABLE IF NOT EXISTS events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        location TEXT NOT NULL,
        dateTime DATETIME NOT NULL,
        user_id INTEGER,
        FOREIGN KEY(user_id) REFERENCES users(id)
    )
";

pub const CREATE_REGISTRATIONS: &str = r"
    CREATE TABLE IF NOT EXISTS registrations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        event_id INTEGER,
        user_id INTEGER,
        FOREIGN KEY(event_id) REFERENCES events(id),
        FOREIGN KEY(user_id) REFERENCES users(id)
    )
";

/// Statements in dependency order: referenced tables first.
const TABLES: [(&str, &str); 3] = [
    ("users", CREATE_USERS),
    ("events", CREATE_EVENTS),
    ("registrations", CREATE_REGISTRATIONS),
];

/// Create every table that does not exist yet.
///
/// # Errors
///
/// Returns the first failing statement's error.
pub async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for (table, statement) in TABLES {
        sqlx::query(statement).execute(pool).await?;
        tracing::debug!(table, "table ready");
    }
    Ok(())
}
