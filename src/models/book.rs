//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{contains_ignore_case, user::StudentRef};

/// Book record held by the catalog
#[derive(Debug, Clone, Serialize)]
pub struct Book {
    pub id: String,
    pub name: String,
    pub isbn: String,
    pub author: String,
    pub category: String,
    pub price: f64,
    pub storage_path: String,
    /// Set by the administrator; not consulted when borrowing
    pub available: bool,
    #[serde(skip)]
    pub borrowed_by: Option<StudentRef>,
    pub borrowed_at: Option<DateTime<Utc>>,
    pub added_at: DateTime<Utc>,
}

impl Book {
    pub fn new(id: String, create: CreateBook) -> Self {
        Self {
            id,
            name: create.name,
            isbn: create.isbn,
            author: create.author,
            category: create.category,
            price: create.price,
            storage_path: create.storage_path,
            available: create.available,
            borrowed_by: None,
            borrowed_at: None,
            added_at: Utc::now(),
        }
    }

    pub fn is_borrowed(&self) -> bool {
        self.borrowed_by.is_some()
    }

    pub fn lend_to(&mut self, student: StudentRef, at: DateTime<Utc>) {
        self.borrowed_by = Some(student);
        self.borrowed_at = Some(at);
    }

    pub fn take_back(&mut self) {
        self.borrowed_by = None;
        self.borrowed_at = None;
    }
}

/// Add book request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Book name is required"))]
    pub name: String,
    pub isbn: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    pub category: String,
    #[validate(custom(function = "validate_price"))]
    pub price: f64,
    pub storage_path: String,
    pub available: bool,
}

/// Prices are finite and not negative
fn validate_price(price: f64) -> Result<(), ValidationError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        let mut error = ValidationError::new("price");
        error.message = Some("Price must be a finite, non-negative number".into());
        Err(error)
    }
}

/// Book listing filters, matched as case-insensitive substrings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookQuery {
    pub title: Option<String>,
    pub author: Option<String>,
}

impl BookQuery {
    pub fn matches(&self, book: &Book) -> bool {
        let title_ok = self
            .title
            .as_deref()
            .map_or(true, |title| contains_ignore_case(&book.name, title));
        let author_ok = self
            .author
            .as_deref()
            .map_or(true, |author| contains_ignore_case(&book.author, author));
        title_ok && author_ok
    }
}

/// Short book representation for listings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookShort {
    pub id: String,
    pub name: String,
    pub author: String,
    pub available: bool,
    pub borrowed: bool,
    /// Borrower email, only filled in for administrators
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrowed_by: Option<String>,
}

impl From<&Book> for BookShort {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            author: book.author.clone(),
            available: book.available,
            borrowed: book.is_borrowed(),
            borrowed_by: None,
        }
    }
}
