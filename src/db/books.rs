use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, Error as SqlError, ErrorCode, OptionalExtension, Row};

use crate::models::{Author, Book};

use super::authors::{author_exists, fetch_authors_for_book, insert_author};

/// Raw column values of a `books` row before validation.
struct BookRow {
    id: String,
    title: String,
    publication_year: Option<i32>,
    isbn: Option<String>,
    publisher: Option<String>,
    page_count: Option<i64>,
    synopsis: Option<String>,
}

impl BookRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            publication_year: row.get(2)?,
            isbn: row.get(3)?,
            publisher: row.get(4)?,
            page_count: row.get(5)?,
            synopsis: row.get(6)?,
        })
    }

    fn into_book(self, authors: Vec<Author>) -> Result<Book> {
        let context = || format!("stored book {} is invalid", self.id);
        let mut book = Book::with_id(self.id.as_str(), &self.title).with_context(context)?;
        book.set_publication_year(self.publication_year)
            .with_context(context)?;
        book.set_page_count(self.page_count.unwrap_or(0))
            .with_context(context)?;
        book.set_isbn(self.isbn);
        book.set_publisher(self.publisher.unwrap_or_default());
        book.set_synopsis(self.synopsis.unwrap_or_default());
        for author in authors {
            book.add_author(author);
        }
        Ok(book)
    }
}

const BOOK_COLUMNS: &str =
    "id, title, publication_year, isbn, publisher, page_count, synopsis";

/// Insert the book row and its author links. Authors the database has not seen
/// yet are inserted on the way, using the same connection so they share the
/// caller's transaction.
pub(crate) fn insert_book(conn: &Connection, book: &Book) -> Result<()> {
    conn.execute(
        "INSERT INTO books (id, title, publication_year, isbn, publisher, page_count, synopsis)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            book.id(),
            book.title(),
            book.publication_year(),
            book.isbn(),
            book.publisher(),
            book.page_count(),
            book.synopsis()
        ],
    )
    .map_err(|err| map_isbn_constraint(err, book))
    .context("failed to insert book")?;

    link_authors(conn, book)
}

/// Overwrite the scalar columns of an existing book. Errors when no row
/// matched so the caller can roll back.
pub(crate) fn update_book_row(conn: &Connection, book: &Book) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE books
             SET title = ?1, publication_year = ?2, isbn = ?3, publisher = ?4,
                 page_count = ?5, synopsis = ?6
             WHERE id = ?7",
            params![
                book.title(),
                book.publication_year(),
                book.isbn(),
                book.publisher(),
                book.page_count(),
                book.synopsis(),
                book.id()
            ],
        )
        .map_err(|err| map_isbn_constraint(err, book))
        .context("failed to update book")?;

    if updated == 0 {
        Err(anyhow!("Book {} not found", book.id()))
    } else {
        Ok(())
    }
}

/// Drop every author link of the book and write the current list back.
pub(crate) fn replace_book_authors(conn: &Connection, book: &Book) -> Result<()> {
    conn.execute(
        "DELETE FROM book_authors WHERE book_id = ?1",
        params![book.id()],
    )
    .context("failed to clear book authors")?;

    link_authors(conn, book)
}

fn link_authors(conn: &Connection, book: &Book) -> Result<()> {
    for author in book.authors() {
        if !author_exists(conn, author.id())? {
            insert_author(conn, author)?;
            tracing::info!(
                author_id = %author.id(),
                author = %author.name(),
                book = %book.title(),
                "created missing author while saving book"
            );
        }

        conn.execute(
            "INSERT INTO book_authors (book_id, author_id) VALUES (?1, ?2)",
            params![book.id(), author.id()],
        )
        .with_context(|| format!("failed to link author '{}' to book", author.name()))?;
    }
    Ok(())
}

/// Remove a book row. The schema cascades to `book_authors` and `loans`.
pub(crate) fn delete_book(conn: &Connection, id: &str) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM books WHERE id = ?1", params![id])
        .context("failed to delete book")?;

    if deleted == 0 {
        Err(anyhow!("Book {id} not found"))
    } else {
        Ok(())
    }
}

/// Every book ordered by title, each with its authors resolved by a separate
/// query. Rows that no longer pass validation are skipped with a warning.
pub(crate) fn fetch_books(conn: &Connection) -> Result<Vec<Book>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY title"))
        .context("failed to prepare book query")?;

    let rows = stmt
        .query_map([], BookRow::read)
        .context("failed to load books")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect books")?;

    let mut books = Vec::with_capacity(rows.len());
    for row in rows {
        let authors = fetch_authors_for_book(conn, &row.id)?;
        let id = row.id.clone();
        match row.into_book(authors) {
            Ok(book) => books.push(book),
            Err(err) => tracing::warn!(book_id = %id, "skipping unreadable book: {err:#}"),
        }
    }
    Ok(books)
}

pub(crate) fn fetch_book(conn: &Connection, id: &str) -> Result<Option<Book>> {
    let row = conn
        .query_row(
            &format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"),
            [id],
            BookRow::read,
        )
        .optional()
        .context("failed to load book")?;

    match row {
        Some(row) => {
            let authors = fetch_authors_for_book(conn, &row.id)?;
            row.into_book(authors).map(Some)
        }
        None => Ok(None),
    }
}

/// Turn a uniqueness failure on `books.isbn` into a readable message. Other
/// errors pass through untouched.
fn map_isbn_constraint(err: SqlError, book: &Book) -> anyhow::Error {
    let is_isbn_clash = matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::ConstraintViolation)
    ) && err.to_string().contains("books.isbn");

    match (is_isbn_clash, book.isbn()) {
        (true, Some(isbn)) => anyhow!("ISBN {isbn} is already in the catalog."),
        _ => err.into(),
    }
}
