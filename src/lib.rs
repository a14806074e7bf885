//! Core library surface for the personal library manager.
//!
//! The binary only wires these pieces together; keeping them in a library lets
//! the integration tests drive the same gateway the TUI uses.
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

/// Persistence gateway over the SQLite catalog.
pub use db::Gateway;

/// The domain records the other layers pass around.
pub use models::{Author, Book, Loan, LoanStatus};

pub use config::LibraryConfig;
pub use error::ValidationError;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
