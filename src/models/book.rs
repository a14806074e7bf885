use std::fmt;

use chrono::{Datelike, Local};

use crate::error::ValidationError;

use super::{generate_id, require_text, Author};

/// Catalog entry for a single book. Field setters enforce the same rules the
/// add/edit form checks, so a `Book` that exists is always storable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    id: String,
    title: String,
    publication_year: Option<i32>,
    isbn: Option<String>,
    publisher: String,
    page_count: i64,
    synopsis: String,
    authors: Vec<Author>,
}

impl Book {
    pub fn new(title: &str) -> Result<Self, ValidationError> {
        Self::with_id(generate_id(), title)
    }

    pub fn with_id(id: impl Into<String>, title: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: id.into(),
            title: require_text(title, ValidationError::EmptyTitle)?,
            publication_year: None,
            isbn: None,
            publisher: String::new(),
            page_count: 0,
            synopsis: String::new(),
            authors: Vec::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), ValidationError> {
        self.title = require_text(title, ValidationError::EmptyTitle)?;
        Ok(())
    }

    pub fn publication_year(&self) -> Option<i32> {
        self.publication_year
    }

    /// Accepts any year up to and including the current one.
    pub fn set_publication_year(&mut self, year: Option<i32>) -> Result<(), ValidationError> {
        if let Some(year) = year {
            let max = current_year();
            if year > max {
                return Err(ValidationError::FutureYear { year, max });
            }
        }
        self.publication_year = year;
        Ok(())
    }

    pub fn isbn(&self) -> Option<&str> {
        self.isbn.as_deref()
    }

    pub fn set_isbn(&mut self, isbn: Option<String>) {
        self.isbn = isbn;
    }

    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    pub fn set_publisher(&mut self, publisher: impl Into<String>) {
        self.publisher = publisher.into();
    }

    pub fn page_count(&self) -> i64 {
        self.page_count
    }

    pub fn set_page_count(&mut self, pages: i64) -> Result<(), ValidationError> {
        if pages < 0 {
            return Err(ValidationError::NegativePageCount(pages));
        }
        self.page_count = pages;
        Ok(())
    }

    pub fn synopsis(&self) -> &str {
        &self.synopsis
    }

    pub fn set_synopsis(&mut self, synopsis: impl Into<String>) {
        self.synopsis = synopsis.into();
    }

    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    /// Attach an author unless one with the same id is already listed.
    pub fn add_author(&mut self, author: Author) {
        if !self.authors.iter().any(|known| known.id() == author.id()) {
            self.authors.push(author);
        }
    }

    /// Detach an author by id. Unknown ids are ignored.
    pub fn remove_author(&mut self, author_id: &str) {
        self.authors.retain(|known| known.id() != author_id);
    }

    pub fn clear_authors(&mut self) {
        self.authors.clear();
    }

    /// Comma separated author names, in list order.
    pub fn author_names(&self) -> String {
        self.authors
            .iter()
            .map(Author::name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// One-line summary used in logs and status messages.
    pub fn short_description(&self) -> String {
        let authors = if self.authors.is_empty() {
            "Unknown".to_string()
        } else {
            self.author_names()
        };
        let year = self
            .publication_year
            .map(|year| year.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        format!("Book: {} by {} (Year: {})", self.title, authors, year)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_description())
    }
}

pub(crate) fn current_year() -> i32 {
    Local::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(id: &str, name: &str) -> Author {
        Author::with_id(id, name).unwrap()
    }

    #[test]
    fn rejects_blank_title() {
        assert_eq!(Book::new(" "), Err(ValidationError::EmptyTitle));

        let mut book = Book::new("Dune").unwrap();
        assert_eq!(book.set_title(""), Err(ValidationError::EmptyTitle));
        assert_eq!(book.title(), "Dune");
    }

    #[test]
    fn rejects_future_publication_year() {
        let mut book = Book::new("Dune").unwrap();
        let next = current_year() + 1;

        assert_eq!(
            book.set_publication_year(Some(next)),
            Err(ValidationError::FutureYear {
                year: next,
                max: current_year()
            })
        );
        assert_eq!(book.publication_year(), None);

        book.set_publication_year(Some(current_year())).unwrap();
        book.set_publication_year(Some(1965)).unwrap();
        assert_eq!(book.publication_year(), Some(1965));

        book.set_publication_year(None).unwrap();
        assert_eq!(book.publication_year(), None);
    }

    #[test]
    fn rejects_negative_page_count() {
        let mut book = Book::new("Dune").unwrap();
        assert_eq!(
            book.set_page_count(-1),
            Err(ValidationError::NegativePageCount(-1))
        );
        book.set_page_count(0).unwrap();
        book.set_page_count(412).unwrap();
        assert_eq!(book.page_count(), 412);
    }

    #[test]
    fn author_membership_is_idempotent() {
        let mut book = Book::new("Good Omens").unwrap();
        book.add_author(author("a-1", "Terry Pratchett"));
        book.add_author(author("a-1", "Terry Pratchett"));
        book.add_author(author("a-2", "Neil Gaiman"));
        assert_eq!(book.authors().len(), 2);
        assert_eq!(book.author_names(), "Terry Pratchett, Neil Gaiman");

        book.remove_author("missing");
        assert_eq!(book.authors().len(), 2);

        book.remove_author("a-1");
        assert_eq!(book.author_names(), "Neil Gaiman");
    }

    #[test]
    fn short_description_uses_placeholders() {
        let mut book = Book::new("Anonymous Tales").unwrap();
        assert_eq!(
            book.short_description(),
            "Book: Anonymous Tales by Unknown (Year: N/A)"
        );

        book.add_author(author("a-1", "Frank Herbert"));
        book.set_publication_year(Some(1965)).unwrap();
        assert_eq!(
            book.to_string(),
            "Book: Anonymous Tales by Frank Herbert (Year: 1965)"
        );
    }
}
