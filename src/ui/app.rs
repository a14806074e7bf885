use std::mem;

use anyhow::{anyhow, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::db::Gateway;
use crate::models::Book;

use super::forms::{resolve_authors, BookField, BookForm, ConfirmBookDelete};
use super::helpers::{centered_rect, key_hint, or_not_available, surface_error};
use super::screens::BookListScreen;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp / PageDown.
const PAGE_STEP: isize = 5;

/// Fine-grained modes layered over the book list.
enum Mode {
    Normal,
    AddingBook(BookForm),
    EditingBook { book: Book, form: BookForm },
    ConfirmBookDelete(ConfirmBookDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Warning,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Warning => Style::default().fg(Color::Yellow),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    gateway: Gateway,
    screen: BookListScreen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(gateway: Gateway, books: Vec<Book>) -> Self {
        Self {
            gateway,
            screen: BookListScreen::new(books),
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Prepare the database and load the catalog. When the schema cannot be
    /// created the shell still starts, with an error in the footer.
    pub fn open(gateway: Gateway) -> Self {
        let schema_ready = gateway.ensure_schema();
        tracing::info!(schema_ready, "database prepared");
        let books = gateway.list_books();

        let mut app = Self::new(gateway, books);
        if !schema_ready {
            app.notify_error("Could not prepare the library database. See the log for details.");
        }
        app
    }

    /// Show an error in the footer.
    pub fn notify_error(&mut self, text: impl Into<String>) {
        self.set_status(text, StatusKind::Error);
    }

    /// React to one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingBook(form) => self.handle_add_book(code, form)?,
            Mode::EditingBook { book, form } => self.handle_edit_book(code, book, form)?,
            Mode::ConfirmBookDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Esc => {
                self.screen.clear_selection();
                self.clear_status();
            }
            KeyCode::Up => self.screen.move_selection(-1),
            KeyCode::Down => self.screen.move_selection(1),
            KeyCode::PageUp => self.screen.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.screen.move_selection(PAGE_STEP),
            KeyCode::Home => self.screen.select_first(),
            KeyCode::End => self.screen.select_last(),
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::AddingBook(BookForm::default()));
            }
            KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char('E') => {
                return Ok(self.open_edit_form());
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('-') => {
                if let Some(book) = self.screen.current_book() {
                    let confirm = ConfirmBookDelete::from(book);
                    self.clear_status();
                    return Ok(Mode::ConfirmBookDelete(confirm));
                }
                self.set_status(
                    "Select a book in the list to remove it.",
                    StatusKind::Warning,
                );
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.reload_books();
                self.set_status("Book list refreshed.", StatusKind::Info);
            }
            KeyCode::Char('u') | KeyCode::Char('U') => {
                self.set_status(
                    "Manage Authors is not implemented yet.",
                    StatusKind::Info,
                );
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                self.set_status("Manage Loans is not implemented yet.", StatusKind::Info);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    /// Load the selected book fresh from storage and open it in the form.
    fn open_edit_form(&mut self) -> Mode {
        let Some(id) = self.screen.current_book().map(|book| book.id().to_string()) else {
            self.set_status("Select a book in the list to edit it.", StatusKind::Warning);
            return Mode::Normal;
        };

        match self.gateway.find_book(&id) {
            Some(book) => {
                self.clear_status();
                Mode::EditingBook {
                    form: BookForm::from_book(&book),
                    book,
                }
            }
            None => {
                self.reload_books();
                self.set_status(
                    "Could not load the book for editing.",
                    StatusKind::Error,
                );
                Mode::Normal
            }
        }
    }

    fn handle_add_book(&mut self, code: KeyCode, mut form: BookForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_book(&form) {
                Ok(()) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingBook(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_edit_book(&mut self, code: KeyCode, book: Book, mut form: BookForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_existing_book(&book, &form) {
                Ok(()) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::EditingBook { book, form })
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmBookDelete) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Removal cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.perform_delete(&confirm);
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmBookDelete(confirm)),
        }
    }

    fn save_new_book(&mut self, form: &BookForm) -> Result<()> {
        let input = form.parse_inputs()?;
        let authors = resolve_authors(&self.gateway, &input.author_names);
        if authors.is_empty() {
            tracing::warn!(title = %input.title, "no authors could be stored for new book");
        }

        let book = input.build_book(authors)?;
        if !self.gateway.add_book(&book) {
            return Err(anyhow!("Could not add the book to the library database."));
        }

        tracing::info!(book_id = %book.id(), "{}", book.short_description());
        self.reload_books();
        self.set_status(format!("Added '{}'.", book.title()), StatusKind::Info);
        Ok(())
    }

    fn save_existing_book(&mut self, original: &Book, form: &BookForm) -> Result<()> {
        let input = form.parse_inputs()?;
        let authors = resolve_authors(&self.gateway, &input.author_names);
        if authors.is_empty() {
            tracing::warn!(book_id = %original.id(), "no authors could be stored for edited book");
        }

        let mut book = original.clone();
        input.apply_to(&mut book, authors)?;
        if !self.gateway.update_book(&book) {
            return Err(anyhow!("Could not update the book in the library database."));
        }

        tracing::info!(book_id = %book.id(), "updated {}", book.short_description());
        self.reload_books();
        self.set_status(format!("Updated '{}'.", book.title()), StatusKind::Info);
        Ok(())
    }

    /// Delete the confirmed book. On failure the list is left as it was.
    fn perform_delete(&mut self, confirm: &ConfirmBookDelete) {
        if self.gateway.remove_book(&confirm.id) {
            tracing::info!(book_id = %confirm.id, title = %confirm.title, "removed book");
            self.reload_books();
            self.set_status(format!("Removed '{}'.", confirm.title), StatusKind::Info);
        } else {
            self.set_status(
                format!("Failed to remove '{}'.", confirm.title),
                StatusKind::Error,
            );
        }
    }

    fn reload_books(&mut self) {
        self.screen.set_books(self.gateway.list_books());
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();

        // Too short for both: the table keeps the whole screen.
        if area.height <= FOOTER_HEIGHT {
            self.draw_book_table(frame, area);
        } else {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(FOOTER_HEIGHT)])
                .split(area);
            self.draw_book_table(frame, chunks[0]);
            self.draw_footer(frame, chunks[1]);
        }

        match &self.mode {
            Mode::AddingBook(form) => self.draw_book_form(frame, area, "Add New Book", form),
            Mode::EditingBook { form, .. } => self.draw_book_form(frame, area, "Edit Book", form),
            Mode::ConfirmBookDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_book_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Library Collection")
            .borders(Borders::ALL);

        if self.screen.books.is_empty() {
            let message = Paragraph::new("No books yet. Press 'a' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header_style = Style::default().add_modifier(Modifier::BOLD);
        let header = Row::new(["ID", "Title", "Author(s)", "ISBN", "Year"]).style(header_style);

        let rows = self.screen.books.iter().map(|book| {
            Row::new(vec![
                Cell::from(book.id().to_string()),
                Cell::from(book.title().to_string()),
                Cell::from(or_not_available(Some(book.author_names()))),
                Cell::from(book.isbn().unwrap_or_default().to_string()),
                Cell::from(or_not_available(
                    book.publication_year().map(|year| year.to_string()),
                )),
            ])
        });

        let widths = [
            Constraint::Length(36),
            Constraint::Min(20),
            Constraint::Min(16),
            Constraint::Length(15),
            Constraint::Length(6),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(2)
            .row_highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );

        let mut state = TableState::default().with_selected(self.screen.selected);
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        match &self.mode {
            Mode::AddingBook(_) | Mode::EditingBook { .. } => Line::from(
                [
                    key_hint("Tab", "Next field", true),
                    key_hint("Enter", "Save", true),
                    key_hint("Esc", "Cancel", true),
                ]
                .concat(),
            ),
            Mode::ConfirmBookDelete(_) => Line::from(
                [key_hint("y", "Remove", true), key_hint("n", "Keep", true)].concat(),
            ),
            Mode::Normal => {
                let selected = self.screen.has_selection();
                Line::from(
                    [
                        key_hint("↑↓", "Select", true),
                        key_hint("a", "Add", true),
                        key_hint("e", "Edit", selected),
                        key_hint("d", "Remove", selected),
                        key_hint("r", "Refresh", true),
                        key_hint("u", "Authors", true),
                        key_hint("l", "Loans", true),
                        key_hint("q", "Quit", true),
                    ]
                    .concat(),
                )
            }
        }
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &BookForm) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = BookField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(Span::styled(
            "Separate authors with commas, e.g. Terry Pratchett, Neil Gaiman",
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch field • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, inner);

        let row = BookField::ALL
            .iter()
            .position(|field| *field == form.active)
            .unwrap_or(0) as u16;
        let prefix = format!("{}: ", form.active.label()).chars().count() as u16;
        let cursor_x = inner.x + prefix + form.value_len(form.active) as u16;
        frame.set_cursor_position((cursor_x.min(inner.right()), inner.y + row));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmBookDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Removal")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Are you sure you want to remove the book '{}'?",
                confirm.title
            )),
            Line::from("Its loan history goes with it. This cannot be undone."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::TempDb;
    use crate::models::Author;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app_with_books(db: &TempDb, titles: &[&str]) -> App {
        for title in titles {
            let mut book = Book::new(title).unwrap();
            book.add_author(Author::new("Frank Herbert").unwrap());
            assert!(db.gateway.add_book(&book));
        }
        App::new(db.gateway.clone(), db.gateway.list_books())
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn status_text(app: &App) -> Option<&str> {
        app.status.as_ref().map(|status| status.text.as_str())
    }

    #[test]
    fn edit_and_remove_need_a_selection() {
        let db = TempDb::new();
        let mut app = app_with_books(&db, &["Dune"]);

        app.handle_key(KeyCode::Char('e')).unwrap();
        assert!(matches!(app.mode, Mode::Normal));
        app.handle_key(KeyCode::Char('d')).unwrap();
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(
            status_text(&app),
            Some("Select a book in the list to remove it.")
        );
    }

    #[test]
    fn enter_on_selected_row_opens_editor() {
        let db = TempDb::new();
        let mut app = app_with_books(&db, &["Dune"]);

        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();
        match &app.mode {
            Mode::EditingBook { book, form } => {
                assert_eq!(book.title(), "Dune");
                assert_eq!(form.authors, "Frank Herbert");
            }
            _ => panic!("expected the edit form to open"),
        }
    }

    #[test]
    fn adding_a_book_through_the_form() {
        let db = TempDb::new();
        let mut app = App::new(db.gateway.clone(), Vec::new());

        app.handle_key(KeyCode::Char('a')).unwrap();
        type_text(&mut app, "Good Omens");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "Terry Pratchett, Neil Gaiman");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(status_text(&app), Some("Added 'Good Omens'."));
        assert_eq!(app.screen.books.len(), 1);
        assert_eq!(
            app.screen.books[0].author_names(),
            "Terry Pratchett, Neil Gaiman"
        );
        assert_eq!(app.screen.selected, None);
    }

    #[test]
    fn invalid_form_stays_open_with_error() {
        let db = TempDb::new();
        let mut app = App::new(db.gateway.clone(), Vec::new());

        app.handle_key(KeyCode::Char('a')).unwrap();
        type_text(&mut app, "Dune");
        app.handle_key(KeyCode::Enter).unwrap();

        match &app.mode {
            Mode::AddingBook(form) => {
                assert_eq!(
                    form.error.as_deref(),
                    Some("The 'Author(s)' field is required.")
                );
            }
            _ => panic!("form should stay open"),
        }
        assert!(db.gateway.list_books().is_empty());
    }

    #[test]
    fn duplicate_isbn_keeps_form_open_but_leaves_new_author() {
        let db = TempDb::new();
        let mut first = Book::new("Dune").unwrap();
        first.set_isbn(Some("123".to_string()));
        assert!(db.gateway.add_book(&first));
        let mut app = App::new(db.gateway.clone(), db.gateway.list_books());

        app.handle_key(KeyCode::Char('a')).unwrap();
        type_text(&mut app, "Dune Messiah");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "Frank Herbert");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "123");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(matches!(app.mode, Mode::AddingBook(_)));
        assert_eq!(db.gateway.list_books().len(), 1);
        let authors = db.gateway.list_authors();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].name(), "Frank Herbert");
    }

    #[test]
    fn editing_replaces_fields_and_authors() {
        let db = TempDb::new();
        let mut app = app_with_books(&db, &["Dune"]);

        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Char('e')).unwrap();
        for _ in 0.."Dune".len() {
            app.handle_key(KeyCode::Backspace).unwrap();
        }
        type_text(&mut app, "Children of Dune");
        app.handle_key(KeyCode::Tab).unwrap();
        for _ in 0.."Frank Herbert".len() {
            app.handle_key(KeyCode::Backspace).unwrap();
        }
        type_text(&mut app, "Brian Herbert");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        let books = db.gateway.list_books();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title(), "Children of Dune");
        assert_eq!(books[0].author_names(), "Brian Herbert");
    }

    #[test]
    fn confirming_removal_deletes_the_book() {
        let db = TempDb::new();
        let mut app = app_with_books(&db, &["Dune", "Emma"]);

        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Char('d')).unwrap();
        assert!(matches!(app.mode, Mode::ConfirmBookDelete(_)));
        app.handle_key(KeyCode::Char('y')).unwrap();

        assert_eq!(status_text(&app), Some("Removed 'Dune'."));
        let titles: Vec<&str> = app.screen.books.iter().map(Book::title).collect();
        assert_eq!(titles, vec!["Emma"]);
    }

    #[test]
    fn cancelling_removal_keeps_the_book() {
        let db = TempDb::new();
        let mut app = app_with_books(&db, &["Dune"]);

        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Char('d')).unwrap();
        app.handle_key(KeyCode::Esc).unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(db.gateway.list_books().len(), 1);
        assert_eq!(app.screen.selected, Some(0));
    }

    #[test]
    fn failed_removal_leaves_list_untouched() {
        let db = TempDb::new();
        let mut app = app_with_books(&db, &["Dune"]);
        let id = app.screen.books[0].id().to_string();
        assert!(db.gateway.remove_book(&id));

        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Char('d')).unwrap();
        app.handle_key(KeyCode::Char('y')).unwrap();

        assert_eq!(status_text(&app), Some("Failed to remove 'Dune'."));
        assert_eq!(app.screen.books.len(), 1);
    }

    #[test]
    fn stub_screens_report_not_implemented() {
        let db = TempDb::new();
        let mut app = App::new(db.gateway.clone(), Vec::new());

        app.handle_key(KeyCode::Char('u')).unwrap();
        assert_eq!(
            status_text(&app),
            Some("Manage Authors is not implemented yet.")
        );
        app.handle_key(KeyCode::Char('l')).unwrap();
        assert_eq!(status_text(&app), Some("Manage Loans is not implemented yet."));
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn editing_a_vanished_book_reports_and_stays_in_list() {
        let db = TempDb::new();
        let mut app = app_with_books(&db, &["Dune"]);
        let id = app.screen.books[0].id().to_string();

        app.handle_key(KeyCode::Down).unwrap();
        assert!(db.gateway.remove_book(&id));
        app.handle_key(KeyCode::Char('e')).unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(status_text(&app), Some("Could not load the book for editing."));
        assert_eq!(app.status.as_ref().map(|status| status.kind), Some(StatusKind::Error));
        assert!(app.screen.books.is_empty());
    }

    #[test]
    fn startup_without_a_usable_database_shows_an_error() {
        let dir = std::env::temp_dir().join(format!("personal-library-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let app = App::open(Gateway::new(&dir));

        assert_eq!(
            status_text(&app),
            Some("Could not prepare the library database. See the log for details.")
        );
        assert_eq!(app.status.as_ref().map(|status| status.kind), Some(StatusKind::Error));
        assert!(app.screen.books.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn startup_loads_the_catalog_quietly() {
        let db = TempDb::new();
        assert!(db.gateway.add_book(&Book::new("Emma").unwrap()));

        let app = App::open(db.gateway.clone());

        assert!(app.status.is_none());
        assert_eq!(app.screen.books.len(), 1);
    }

    #[test]
    fn notify_error_sets_an_error_status() {
        let db = TempDb::new();
        let mut app = App::new(db.gateway.clone(), Vec::new());

        app.notify_error("disk full");

        assert_eq!(status_text(&app), Some("disk full"));
        assert_eq!(app.status.as_ref().map(|status| status.kind), Some(StatusKind::Error));
    }

    fn render(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn short_terminal_drops_the_footer() {
        let db = TempDb::new();
        let app = App::new(db.gateway.clone(), Vec::new());

        let cramped = render(&app, 60, FOOTER_HEIGHT);
        assert!(cramped.contains("Library Collection"));
        assert!(!cramped.contains("[q]"));

        let roomy = render(&app, 140, 12);
        assert!(roomy.contains("Library Collection"));
        assert!(roomy.contains("[q]"));
    }
}
