//! Terminal shell over the book catalog: a selectable list plus modal forms
//! for adding, editing and removing books.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
