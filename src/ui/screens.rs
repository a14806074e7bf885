use crate::models::Book;

/// The catalog list with its single-row selection. Nothing is selected right
/// after the list is (re)loaded, which keeps edit and remove disabled until
/// the user picks a row.
pub(crate) struct BookListScreen {
    pub(crate) books: Vec<Book>,
    pub(crate) selected: Option<usize>,
}

impl BookListScreen {
    pub(crate) fn new(books: Vec<Book>) -> Self {
        Self {
            books,
            selected: None,
        }
    }

    /// Swap in a fresh list and drop the selection.
    pub(crate) fn set_books(&mut self, books: Vec<Book>) {
        self.books = books;
        self.selected = None;
    }

    pub(crate) fn current_book(&self) -> Option<&Book> {
        self.selected.and_then(|idx| self.books.get(idx))
    }

    pub(crate) fn has_selection(&self) -> bool {
        self.current_book().is_some()
    }

    /// Move the selection by `offset` rows, clamping at both ends. With no
    /// selection, moving down starts at the top and moving up at the bottom.
    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.books.is_empty() {
            self.selected = None;
            return;
        }
        let last = self.books.len() as isize - 1;
        let next = match self.selected {
            Some(current) => (current as isize + offset).clamp(0, last),
            None if offset < 0 => last,
            None => 0,
        };
        self.selected = Some(next as usize);
    }

    pub(crate) fn select_first(&mut self) {
        if !self.books.is_empty() {
            self.selected = Some(0);
        }
    }

    pub(crate) fn select_last(&mut self) {
        if !self.books.is_empty() {
            self.selected = Some(self.books.len() - 1);
        }
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(titles: &[&str]) -> BookListScreen {
        BookListScreen::new(
            titles
                .iter()
                .map(|title| Book::new(title).unwrap())
                .collect(),
        )
    }

    #[test]
    fn starts_without_selection() {
        let screen = screen(&["A", "B"]);
        assert!(!screen.has_selection());
        assert!(screen.current_book().is_none());
    }

    #[test]
    fn first_move_picks_an_end() {
        let mut down = screen(&["A", "B", "C"]);
        down.move_selection(1);
        assert_eq!(down.selected, Some(0));

        let mut up = screen(&["A", "B", "C"]);
        up.move_selection(-1);
        assert_eq!(up.selected, Some(2));
    }

    #[test]
    fn movement_is_clamped() {
        let mut screen = screen(&["A", "B", "C"]);
        screen.select_first();
        screen.move_selection(-5);
        assert_eq!(screen.selected, Some(0));
        screen.move_selection(10);
        assert_eq!(screen.selected, Some(2));
        assert_eq!(screen.current_book().map(Book::title), Some("C"));
    }

    #[test]
    fn reloading_clears_selection() {
        let mut screen = screen(&["A", "B"]);
        screen.select_last();
        assert!(screen.has_selection());

        screen.set_books(vec![Book::new("Z").unwrap()]);
        assert_eq!(screen.selected, None);
    }

    #[test]
    fn empty_list_never_selects() {
        let mut screen = screen(&[]);
        screen.move_selection(1);
        screen.select_first();
        screen.select_last();
        assert_eq!(screen.selected, None);
    }
}
