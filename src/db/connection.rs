use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Open a connection to the database file and switch on foreign key
/// enforcement, which SQLite leaves off per connection. Without it neither the
/// `book_authors` nor the `loans` cascades fire.
pub(crate) fn open_connection(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("failed to open SQLite database at {}", path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign keys")?;
    Ok(conn)
}

/// Make sure the data directory and all four tables exist. Safe to run on
/// every start.
pub(crate) fn create_schema(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("failed to create data directory")?;
        }
    }

    let conn = open_connection(path)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS authors (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            birth_date TEXT,
            biography TEXT
        )",
        [],
    )
    .context("failed to create authors table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS books (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            publication_year INTEGER,
            isbn TEXT UNIQUE,
            publisher TEXT,
            page_count INTEGER,
            synopsis TEXT
        )",
        [],
    )
    .context("failed to create books table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS book_authors (
            book_id TEXT NOT NULL,
            author_id TEXT NOT NULL,
            PRIMARY KEY (book_id, author_id),
            FOREIGN KEY(book_id) REFERENCES books(id) ON DELETE CASCADE,
            FOREIGN KEY(author_id) REFERENCES authors(id) ON DELETE CASCADE
        )",
        [],
    )
    .context("failed to create book_authors table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS loans (
            id TEXT PRIMARY KEY,
            book_id TEXT NOT NULL,
            borrower_name TEXT NOT NULL,
            loan_date TEXT NOT NULL,
            due_date TEXT NOT NULL,
            return_date TEXT,
            FOREIGN KEY(book_id) REFERENCES books(id) ON DELETE CASCADE
        )",
        [],
    )
    .context("failed to create loans table")?;

    Ok(())
}
