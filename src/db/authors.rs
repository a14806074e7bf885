use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::Author;

/// Raw column values of an `authors` row before validation.
struct AuthorRow {
    id: String,
    name: String,
    birth_date: Option<NaiveDate>,
    biography: Option<String>,
}

impl AuthorRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            birth_date: row.get(2)?,
            biography: row.get(3)?,
        })
    }

    fn into_author(self) -> Result<Author> {
        let mut author = Author::with_id(self.id.as_str(), &self.name)
            .with_context(|| format!("stored author {} is invalid", self.id))?;
        author.set_birth_date(self.birth_date);
        author.set_biography(self.biography);
        Ok(author)
    }
}

fn collect_authors(rows: Vec<AuthorRow>) -> Result<Vec<Author>> {
    rows.into_iter().map(AuthorRow::into_author).collect()
}

pub(crate) fn insert_author(conn: &Connection, author: &Author) -> Result<()> {
    conn.execute(
        "INSERT INTO authors (id, name, birth_date, biography) VALUES (?1, ?2, ?3, ?4)",
        params![
            author.id(),
            author.name(),
            author.birth_date(),
            author.biography()
        ],
    )
    .with_context(|| format!("failed to insert author '{}'", author.name()))?;
    Ok(())
}

pub(crate) fn author_exists(conn: &Connection, id: &str) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM authors WHERE id = ?1", [id], |_| Ok(()))
        .optional()
        .context("failed to check for existing author")?;
    Ok(found.is_some())
}

/// Every author, ordered by name using SQLite's default (binary) collation.
pub(crate) fn fetch_authors(conn: &Connection) -> Result<Vec<Author>> {
    let mut stmt = conn
        .prepare("SELECT id, name, birth_date, biography FROM authors ORDER BY name")
        .context("failed to prepare author query")?;

    let rows = stmt
        .query_map([], AuthorRow::read)
        .context("failed to load authors")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect authors")?;

    collect_authors(rows)
}

pub(crate) fn fetch_author(conn: &Connection, id: &str) -> Result<Option<Author>> {
    let row = conn
        .query_row(
            "SELECT id, name, birth_date, biography FROM authors WHERE id = ?1",
            [id],
            AuthorRow::read,
        )
        .optional()
        .context("failed to load author")?;

    row.map(AuthorRow::into_author).transpose()
}

/// Authors linked to a book, in the order the links were written.
pub(crate) fn fetch_authors_for_book(conn: &Connection, book_id: &str) -> Result<Vec<Author>> {
    let mut stmt = conn
        .prepare(
            "SELECT a.id, a.name, a.birth_date, a.biography
             FROM authors a
             INNER JOIN book_authors ba ON ba.author_id = a.id
             WHERE ba.book_id = ?1
             ORDER BY ba.rowid",
        )
        .context("failed to prepare book authors query")?;

    let rows = stmt
        .query_map([book_id], AuthorRow::read)
        .context("failed to iterate book authors")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect book authors")?;

    collect_authors(rows)
}
