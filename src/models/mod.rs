//! Data models for the catalog

pub mod book;
pub mod loan;
pub mod session;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookQuery, BookShort, CreateBook};
pub use loan::{Loan, LoanQuery};
pub use session::{Session, SessionState};
pub use user::{Account, AdminRef, RegisterUser, Role, StudentRef, User, UserProfile, UserRef};

/// Case-insensitive substring test; an empty needle matches everything
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
