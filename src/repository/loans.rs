//! Loans repository: the borrowing ledger

use chrono::{DateTime, Utc};

use crate::{
    config::IdStrategy,
    error::{AppError, AppResult},
    models::{loan::Loan, user::StudentRef},
};

use super::IdSequence;

#[derive(Debug, Clone)]
pub struct LoansRepository {
    loans: Vec<Loan>,
    ids: IdSequence,
}

impl LoansRepository {
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            loans: Vec::new(),
            ids: IdSequence::new(strategy),
        }
    }

    pub fn next_id(&mut self) -> AppResult<String> {
        let last = self.loans.last().map(|loan| loan.id.as_str());
        self.ids.next(last)
    }

    /// Record a new loan; the book must not already be out
    pub fn create(&mut self, loan: Loan) -> AppResult<()> {
        if self.open_for_book(&loan.book_id).is_some() {
            return Err(AppError::AlreadyBorrowed(loan.book_id));
        }
        self.ids.observe(&loan.id);
        tracing::debug!("Opening loan id={} book={}", loan.id, loan.book_id);
        self.loans.push(loan);
        Ok(())
    }

    /// Close the open loan of `book_id` held by `student`
    pub fn return_loan(&mut self, book_id: &str, student: StudentRef, at: DateTime<Utc>) -> AppResult<&Loan> {
        let loan = self
            .loans
            .iter_mut()
            .find(|loan| loan.is_open() && loan.book_id == book_id && loan.student == student)
            .ok_or_else(|| AppError::NotBorrowedByCaller(book_id.to_string()))?;
        loan.returned_at = Some(at);
        tracing::debug!("Closing loan id={} book={}", loan.id, book_id);
        Ok(loan)
    }

    pub fn open_for_book(&self, book_id: &str) -> Option<&Loan> {
        self.loans
            .iter()
            .find(|loan| loan.is_open() && loan.book_id == book_id)
    }

    /// Every loan in the order it was opened
    pub fn list(&self) -> &[Loan] {
        &self.loans
    }

    pub fn for_student(&self, student: StudentRef) -> impl Iterator<Item = &Loan> {
        self.loans.iter().filter(move |loan| loan.student == student)
    }

    pub fn overdue(&self, now: DateTime<Utc>) -> impl Iterator<Item = &Loan> {
        self.loans.iter().filter(move |loan| loan.is_overdue(now))
    }
}
