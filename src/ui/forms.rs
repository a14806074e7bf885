use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::db::Gateway;
use crate::models::{current_year, Author, Book};

/// Fields of the add/edit book form, in focus order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum BookField {
    #[default]
    Title,
    Authors,
    Isbn,
    Year,
    Publisher,
    Pages,
    Synopsis,
}

impl BookField {
    pub(crate) const ALL: [BookField; 7] = [
        BookField::Title,
        BookField::Authors,
        BookField::Isbn,
        BookField::Year,
        BookField::Publisher,
        BookField::Pages,
        BookField::Synopsis,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            BookField::Title => "Title",
            BookField::Authors => "Author(s)",
            BookField::Isbn => "ISBN",
            BookField::Year => "Year",
            BookField::Publisher => "Publisher",
            BookField::Pages => "Pages",
            BookField::Synopsis => "Synopsis",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            BookField::Title => "<required>",
            BookField::Authors => "<required, comma separated>",
            _ => "<optional>",
        }
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }

    fn offset(self, delta: isize) -> Self {
        let len = Self::ALL.len() as isize;
        let next = (self.index() as isize + delta).rem_euclid(len);
        Self::ALL[next as usize]
    }
}

/// Typed values pulled out of a [`BookForm`] once every field checks out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BookInput {
    pub(crate) title: String,
    pub(crate) author_names: Vec<String>,
    pub(crate) isbn: Option<String>,
    pub(crate) year: Option<i32>,
    pub(crate) publisher: String,
    pub(crate) pages: i64,
    pub(crate) synopsis: String,
}

impl BookInput {
    /// Build a brand new book from the input.
    pub(crate) fn build_book(&self, authors: Vec<Author>) -> Result<Book> {
        let mut book = Book::new(&self.title)?;
        self.apply_to(&mut book, authors)?;
        Ok(book)
    }

    /// Copy the input onto an existing book, replacing its author list.
    pub(crate) fn apply_to(&self, book: &mut Book, authors: Vec<Author>) -> Result<()> {
        book.set_title(&self.title)?;
        book.set_isbn(self.isbn.clone());
        book.set_publication_year(self.year)?;
        book.set_publisher(self.publisher.clone());
        book.set_page_count(self.pages)?;
        book.set_synopsis(self.synopsis.clone());
        book.clear_authors();
        for author in authors {
            book.add_author(author);
        }
        Ok(())
    }
}

/// Internal representation of the book form fields.
#[derive(Default, Clone, Debug)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) authors: String,
    pub(crate) isbn: String,
    pub(crate) year: String,
    pub(crate) publisher: String,
    pub(crate) pages: String,
    pub(crate) synopsis: String,
    pub(crate) active: BookField,
    pub(crate) error: Option<String>,
}

impl BookForm {
    /// Populate the form from a stored book when editing.
    pub(crate) fn from_book(book: &Book) -> Self {
        Self {
            title: book.title().to_string(),
            authors: book.author_names(),
            isbn: book.isbn().unwrap_or_default().to_string(),
            year: book
                .publication_year()
                .map(|year| year.to_string())
                .unwrap_or_default(),
            publisher: book.publisher().to_string(),
            pages: book.page_count().to_string(),
            synopsis: book.synopsis().to_string(),
            active: BookField::Title,
            error: None,
        }
    }

    pub(crate) fn next_field(&mut self) {
        self.active = self.active.offset(1);
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = self.active.offset(-1);
    }

    fn value(&self, field: BookField) -> &String {
        match field {
            BookField::Title => &self.title,
            BookField::Authors => &self.authors,
            BookField::Isbn => &self.isbn,
            BookField::Year => &self.year,
            BookField::Publisher => &self.publisher,
            BookField::Pages => &self.pages,
            BookField::Synopsis => &self.synopsis,
        }
    }

    fn value_mut(&mut self, field: BookField) -> &mut String {
        match field {
            BookField::Title => &mut self.title,
            BookField::Authors => &mut self.authors,
            BookField::Isbn => &mut self.isbn,
            BookField::Year => &mut self.year,
            BookField::Publisher => &mut self.publisher,
            BookField::Pages => &mut self.pages,
            BookField::Synopsis => &mut self.synopsis,
        }
    }

    /// Append a character to the active field. Control characters are
    /// refused.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let field = self.active;
        self.value_mut(field).push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        let field = self.active;
        self.value_mut(field).pop();
    }

    /// Validate the inputs and return typed values ready for persistence.
    pub(crate) fn parse_inputs(&self) -> Result<BookInput> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(anyhow!("The 'Title' field is required."));
        }

        let author_names = split_author_names(&self.authors);
        if author_names.is_empty() {
            return Err(anyhow!("The 'Author(s)' field is required."));
        }

        let max_year = current_year();
        let year_raw = self.year.trim();
        let year = if year_raw.is_empty() {
            None
        } else {
            let year = year_raw
                .parse::<i32>()
                .map_err(|_| anyhow!("Publication year must be a number."))?;
            if !(0..=max_year).contains(&year) {
                return Err(anyhow!(
                    "Invalid publication year. It must be between 0 and {max_year}."
                ));
            }
            Some(year)
        };

        let pages_raw = self.pages.trim();
        let pages = if pages_raw.is_empty() {
            0
        } else {
            let pages = pages_raw
                .parse::<i64>()
                .map_err(|_| anyhow!("Page count must be a number."))?;
            if pages < 0 {
                return Err(anyhow!("Page count cannot be negative."));
            }
            pages
        };

        let isbn = self.isbn.trim();
        Ok(BookInput {
            title: title.to_string(),
            author_names,
            isbn: (!isbn.is_empty()).then(|| isbn.to_string()),
            year,
            publisher: self.publisher.trim().to_string(),
            pages,
            synopsis: self.synopsis.trim().to_string(),
        })
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: BookField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            field.placeholder().to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Character count of the requested field, used to place the cursor.
    pub(crate) fn value_len(&self, field: BookField) -> usize {
        self.value(field).chars().count()
    }
}

/// Split the free-text author entry on commas, trimming blanks away.
pub(crate) fn split_author_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Map typed author names onto stored authors, matching names without regard
/// to case (the first match wins). Unknown names are stored as new authors
/// right away, before the book itself is saved.
pub(crate) fn resolve_authors(gateway: &Gateway, names: &[String]) -> Vec<Author> {
    let existing = gateway.list_authors();
    let mut resolved = Vec::with_capacity(names.len());

    for name in names {
        let wanted = name.to_lowercase();
        if let Some(author) = existing
            .iter()
            .find(|author| author.name().to_lowercase() == wanted)
        {
            resolved.push(author.clone());
            continue;
        }

        match Author::new(name) {
            Ok(author) if gateway.add_author(&author) => resolved.push(author),
            Ok(_) => tracing::warn!(author = %name, "could not store new author"),
            Err(err) => tracing::warn!(author = %name, "rejected author name: {err}"),
        }
    }

    resolved
}

/// State for confirming permanent book removal.
#[derive(Clone, Debug)]
pub(crate) struct ConfirmBookDelete {
    pub(crate) id: String,
    pub(crate) title: String,
}

impl From<&Book> for ConfirmBookDelete {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id().to_string(),
            title: book.title().to_string(),
        }
    }
}
