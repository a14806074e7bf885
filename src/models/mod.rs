//! Domain records passed between the gateway and the terminal shell. Each type
//! validates its fields on construction and on every setter, so the rest of
//! the crate can assume a record in hand is well formed.

mod author;
mod book;
mod loan;

pub use author::Author;
pub use book::Book;
pub(crate) use book::current_year;
pub use loan::{Loan, LoanStatus};

use uuid::Uuid;

use crate::error::ValidationError;

/// Identifiers are random UUIDs rendered as text, matching the `TEXT PRIMARY
/// KEY` columns in the schema.
pub(crate) fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Reject empty or whitespace-only text, returning it unchanged otherwise.
fn require_text(value: &str, err: ValidationError) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        Err(err)
    } else {
        Ok(value.to_string())
    }
}
