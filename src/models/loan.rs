//! Loan (borrow) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{contains_ignore_case, user::StudentRef};

/// One borrowing of a book, kept after the book comes back
#[derive(Debug, Clone, Serialize)]
pub struct Loan {
    pub id: String,
    pub book_id: String,
    pub book_name: String,
    #[serde(skip)]
    pub student: StudentRef,
    pub borrower_id: String,
    pub borrower_email: String,
    pub borrowed_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }

    /// Still out after its due date
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_open() && now > self.due_at
    }
}

/// Loan listing filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoanQuery {
    /// `Some(true)` keeps returned loans only, `Some(false)` open ones only
    pub returned: Option<bool>,
    /// Case-insensitive substring of the book name
    pub book_name: Option<String>,
}

impl LoanQuery {
    pub fn matches(&self, loan: &Loan) -> bool {
        let returned_ok = self.returned.map_or(true, |returned| returned != loan.is_open());
        let name_ok = self
            .book_name
            .as_deref()
            .map_or(true, |name| contains_ignore_case(&loan.book_name, name));
        returned_ok && name_ok
    }
}
