use std::fmt;

use chrono::NaiveDate;

use crate::error::ValidationError;

use super::{generate_id, require_text, Book};

/// Whether a loaned book is still with the borrower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    Out,
    Returned,
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanStatus::Out => write!(f, "out"),
            LoanStatus::Returned => write!(f, "returned"),
        }
    }
}

/// A book lent to somebody. Starts out `Out` and moves to `Returned` exactly
/// once, through [`Loan::register_return`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    id: String,
    book: Book,
    borrower: String,
    loan_date: NaiveDate,
    due_date: NaiveDate,
    return_date: Option<NaiveDate>,
}

impl Loan {
    pub fn new(
        book: Book,
        borrower: &str,
        loan_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        Self::with_id(generate_id(), book, borrower, loan_date, due_date)
    }

    pub fn with_id(
        id: impl Into<String>,
        book: Book,
        borrower: &str,
        loan_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: id.into(),
            book,
            borrower: require_text(borrower, ValidationError::EmptyBorrower)?,
            loan_date,
            due_date,
            return_date: None,
        })
    }

    /// Rebuild a stored loan, return date included. Unlike
    /// [`Loan::register_return`] this records no event.
    pub(crate) fn restore(
        id: impl Into<String>,
        book: Book,
        borrower: &str,
        loan_date: NaiveDate,
        due_date: NaiveDate,
        return_date: Option<NaiveDate>,
    ) -> Result<Self, ValidationError> {
        let mut loan = Self::with_id(id, book, borrower, loan_date, due_date)?;
        if let Some(returned) = return_date {
            if returned < loan_date {
                return Err(ValidationError::ReturnBeforeLoan {
                    returned,
                    loaned: loan_date,
                });
            }
            loan.return_date = Some(returned);
        }
        Ok(loan)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn borrower(&self) -> &str {
        &self.borrower
    }

    pub fn loan_date(&self) -> NaiveDate {
        self.loan_date
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    pub fn status(&self) -> LoanStatus {
        if self.return_date.is_some() {
            LoanStatus::Returned
        } else {
            LoanStatus::Out
        }
    }

    /// Record the day the book came back. The date may not precede the loan
    /// date, and a loan can only be returned once.
    pub fn register_return(&mut self, date: NaiveDate) -> Result<(), ValidationError> {
        if let Some(returned) = self.return_date {
            return Err(ValidationError::AlreadyReturned(returned));
        }
        if date < self.loan_date {
            return Err(ValidationError::ReturnBeforeLoan {
                returned: date,
                loaned: self.loan_date,
            });
        }
        self.return_date = Some(date);
        tracing::debug!(
            loan_id = %self.id,
            book = %self.book.title(),
            borrower = %self.borrower,
            returned = %date,
            "loan returned"
        );
        Ok(())
    }
}

impl fmt::Display for Loan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Loan ID: {}", self.id)?;
        writeln!(f, "  Book: {}", self.book.title())?;
        writeln!(f, "  Borrower: {}", self.borrower)?;
        writeln!(f, "  Loan date: {}", self.loan_date)?;
        writeln!(f, "  Due date: {}", self.due_date)?;
        write!(f, "  Status: {}", self.status())?;
        if let Some(returned) = self.return_date {
            write!(f, "\n  Returned on: {returned}")?;
        }
        Ok(())
    }
}
