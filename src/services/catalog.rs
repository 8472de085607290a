//! Catalog management: adding and finding books

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookQuery, BookShort, CreateBook},
        user::UserRef,
    },
};

use super::{require_book_id, Services};

impl Services {
    /// Add a book to the catalog (administrator only) and return its id
    pub fn add_book(&mut self, create: CreateBook) -> AppResult<String> {
        let admin = match self.require_administrator("add books") {
            Ok(admin) => admin,
            Err(e) => {
                tracing::warn!("Rejected add book '{}': {}", create.name, e);
                return Err(e);
            }
        };
        create.validate()?;

        let id = self.repository.books.next_id()?;
        let book = Book::new(id.clone(), create);
        tracing::info!("Adding book id={} name='{}'", id, book.name);
        self.repository.books.add(book, admin)?;
        Ok(id)
    }

    /// Name of the book with the given id. Needs no login.
    pub fn search_book(&self, book_id: &str) -> AppResult<String> {
        self.get_book(book_id).map(|book| book.name.clone())
    }

    /// Full record of the book with the given id
    pub fn get_book(&self, book_id: &str) -> AppResult<&Book> {
        require_book_id(book_id)?;
        self.repository.books.find_by_id(book_id)
    }

    /// Books matching `query`, in the order they were added.
    ///
    /// Administrators see every book along with its borrower's email. Students
    /// and logged-out callers only see books nobody holds.
    pub fn list_books(&self, query: &BookQuery) -> Vec<BookShort> {
        let is_admin = matches!(self.session.identity(), Some(UserRef::Administrator(_)));
        self.repository
            .books
            .list()
            .iter()
            .filter(|book| query.matches(book))
            .filter(|book| is_admin || !book.is_borrowed())
            .map(|book| {
                let mut short = BookShort::from(book);
                if is_admin {
                    short.borrowed_by = self.borrower_email(book);
                }
                short
            })
            .collect()
    }

    fn borrower_email(&self, book: &Book) -> Option<String> {
        let student = book.borrowed_by?;
        let account = self.repository.users.get(UserRef::Student(student)).ok()?;
        Some(account.email.clone())
    }
}
