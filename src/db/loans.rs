use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

use crate::models::Loan;

use super::books::fetch_book;

struct LoanRow {
    id: String,
    book_id: String,
    borrower: String,
    loan_date: NaiveDate,
    due_date: NaiveDate,
    return_date: Option<NaiveDate>,
}

impl LoanRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            book_id: row.get(1)?,
            borrower: row.get(2)?,
            loan_date: row.get(3)?,
            due_date: row.get(4)?,
            return_date: row.get(5)?,
        })
    }
}

pub(crate) fn insert_loan(conn: &Connection, loan: &Loan) -> Result<()> {
    conn.execute(
        "INSERT INTO loans (id, book_id, borrower_name, loan_date, due_date, return_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            loan.id(),
            loan.book().id(),
            loan.borrower(),
            loan.loan_date(),
            loan.due_date(),
            loan.return_date()
        ],
    )
    .context("failed to insert loan")?;
    Ok(())
}

/// All loans, most recent first. A loan whose book can no longer be found is
/// skipped with a warning rather than failing the whole listing.
pub(crate) fn fetch_loans(conn: &Connection) -> Result<Vec<Loan>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, book_id, borrower_name, loan_date, due_date, return_date
             FROM loans
             ORDER BY loan_date DESC",
        )
        .context("failed to prepare loan query")?;

    let rows = stmt
        .query_map([], LoanRow::read)
        .context("failed to load loans")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect loans")?;

    let mut loans = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(book) = fetch_book(conn, &row.book_id)? else {
            tracing::warn!(
                loan_id = %row.id,
                book_id = %row.book_id,
                "skipping loan whose book no longer exists"
            );
            continue;
        };

        let loan = Loan::restore(
            row.id.as_str(),
            book,
            &row.borrower,
            row.loan_date,
            row.due_date,
            row.return_date,
        )
        .with_context(|| format!("stored loan {} is invalid", row.id))?;
        loans.push(loan);
    }

    Ok(loans)
}

/// Persist the return date of a loan. Nothing else about a loan is editable.
pub(crate) fn update_return_date(conn: &Connection, loan: &Loan) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE loans SET return_date = ?1 WHERE id = ?2",
            params![loan.return_date(), loan.id()],
        )
        .context("failed to update loan")?;

    if updated == 0 {
        Err(anyhow!("Loan {} not found", loan.id()))
    } else {
        Ok(())
    }
}
