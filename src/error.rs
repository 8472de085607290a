//! Error types for the catalog core

use thiserror::Error;

/// Numeric error codes shown next to error messages by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    NotAuthorized = 2,
    NoSuchUser = 4,
    NoSuchItem = 5,
    ItemNotAvailable = 7,
    BadValue = 18,
    NotBorrower = 22,
}

/// Main application error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Book {0} is already borrowed")]
    AlreadyBorrowed(String),

    #[error("Book {0} was not borrowed by this student")]
    NotBorrowedByCaller(String),
}

impl AppError {
    /// Error code matching this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::UserNotFound(_) => ErrorCode::NoSuchUser,
            AppError::BookNotFound(_) => ErrorCode::NoSuchItem,
            AppError::Unauthorized(_) | AppError::Authentication(_) => ErrorCode::NotAuthorized,
            AppError::InvalidArgument(_) => ErrorCode::BadValue,
            AppError::AlreadyBorrowed(_) => ErrorCode::ItemNotAvailable,
            AppError::NotBorrowedByCaller(_) => ErrorCode::NotBorrower,
        }
    }

    /// True for lookup misses on either users or books
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::UserNotFound(_) | AppError::BookNotFound(_))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        AppError::InvalidArgument(messages.join(", "))
    }
}

/// Result type alias for catalog operations
pub type AppResult<T> = Result<T, AppError>;
