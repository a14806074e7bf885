//! Validation failures raised by the domain records. Storage problems never
//! show up here: the gateway swallows and logs those.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Author name must not be empty.")]
    EmptyAuthorName,

    #[error("Book title must not be empty.")]
    EmptyTitle,

    #[error("Publication year {year} is in the future (latest allowed is {max}).")]
    FutureYear { year: i32, max: i32 },

    #[error("Page count must not be negative (got {0}).")]
    NegativePageCount(i64),

    #[error("Borrower name must not be empty.")]
    EmptyBorrower,

    #[error("Return date {returned} is earlier than the loan date {loaned}.")]
    ReturnBeforeLoan {
        returned: NaiveDate,
        loaned: NaiveDate,
    },

    #[error("Loan was already returned on {0}.")]
    AlreadyReturned(NaiveDate),
}
