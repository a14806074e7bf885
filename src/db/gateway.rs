use std::path::PathBuf;

use anyhow::{Context, Result};
use rusqlite::{Connection, Transaction};

use crate::models::{Author, Book, Loan};

use super::authors::{fetch_author, fetch_authors, insert_author};
use super::books::{
    delete_book, fetch_book, fetch_books, insert_book, replace_book_authors, update_book_row,
};
use super::connection::{create_schema, open_connection};
use super::loans::{fetch_loans, insert_loan, update_return_date};

/// The only door to the library database.
///
/// Every operation opens its own connection, does one unit of work inside a
/// transaction and closes the connection again. Storage errors never escape:
/// they are logged with their full context chain, the transaction is rolled
/// back, and the caller sees `false`, `None` or an empty list.
#[derive(Debug, Clone)]
pub struct Gateway {
    db_path: PathBuf,
}

impl Gateway {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Create the data directory and tables when missing.
    pub fn ensure_schema(&self) -> bool {
        report("ensure schema", create_schema(&self.db_path))
    }

    pub fn add_author(&self, author: &Author) -> bool {
        self.write("add author", |tx| insert_author(tx, author))
    }

    pub fn list_authors(&self) -> Vec<Author> {
        self.read("list authors", fetch_authors).unwrap_or_default()
    }

    pub fn find_author(&self, id: &str) -> Option<Author> {
        self.read("find author", |conn| fetch_author(conn, id))
            .flatten()
    }

    /// Insert a book together with its author links. Authors that are not
    /// stored yet are created in the same transaction, so a failure (an ISBN
    /// clash, say) leaves no trace of them either.
    pub fn add_book(&self, book: &Book) -> bool {
        self.write("add book", |tx| insert_book(tx, book))
    }

    pub fn list_books(&self) -> Vec<Book> {
        self.read("list books", fetch_books).unwrap_or_default()
    }

    pub fn find_book(&self, id: &str) -> Option<Book> {
        self.read("find book", |conn| fetch_book(conn, id)).flatten()
    }

    /// Delete a book; its author links and loan history go with it.
    pub fn remove_book(&self, id: &str) -> bool {
        self.write("remove book", |tx| delete_book(tx, id))
    }

    /// Rewrite the scalar fields and replace the whole author list.
    pub fn update_book(&self, book: &Book) -> bool {
        self.write("update book", |tx| {
            update_book_row(tx, book)?;
            replace_book_authors(tx, book)
        })
    }

    /// Record a loan. A book that is already out can be lent again.
    pub fn add_loan(&self, loan: &Loan) -> bool {
        self.write("add loan", |tx| insert_loan(tx, loan))
    }

    pub fn list_loans(&self) -> Vec<Loan> {
        self.read("list loans", fetch_loans).unwrap_or_default()
    }

    pub fn update_loan(&self, loan: &Loan) -> bool {
        self.write("update loan", |tx| update_return_date(tx, loan))
    }

    fn connect(&self) -> Result<Connection> {
        open_connection(&self.db_path)
    }

    fn write<F>(&self, operation: &str, work: F) -> bool
    where
        F: FnOnce(&Transaction<'_>) -> Result<()>,
    {
        report(operation, self.run_in_transaction(work))
    }

    fn read<T, F>(&self, operation: &str, work: F) -> Option<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let result = self.connect().and_then(|conn| work(&conn));
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::error!(operation, "storage read failed: {err:#}");
                None
            }
        }
    }

    fn run_in_transaction<F>(&self, work: F) -> Result<()>
    where
        F: FnOnce(&Transaction<'_>) -> Result<()>,
    {
        let mut conn = self.connect()?;
        let tx = conn.transaction().context("failed to begin transaction")?;

        match work(&tx) {
            Ok(()) => tx.commit().context("failed to commit transaction"),
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    tracing::warn!("rollback failed: {rollback_err}");
                }
                Err(err)
            }
        }
    }
}

/// Log a failed write and flatten it into the boolean callers check.
fn report(operation: &str, result: Result<()>) -> bool {
    match result {
        Ok(()) => {
            tracing::debug!(operation, "storage write committed");
            true
        }
        Err(err) => {
            tracing::error!(operation, "storage write failed and was rolled back: {err:#}");
            false
        }
    }
}
