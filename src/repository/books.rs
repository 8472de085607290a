//! Books repository

use crate::{
    config::IdStrategy,
    error::{AppError, AppResult},
    models::{
        book::Book,
        user::{StudentRef, UserRef},
    },
};

use super::IdSequence;

#[derive(Debug, Clone)]
pub struct BooksRepository {
    books: Vec<Book>,
    ids: IdSequence,
}

impl BooksRepository {
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            books: Vec::new(),
            ids: IdSequence::new(strategy),
        }
    }

    /// Insert a book on behalf of `acting`, who must be an administrator
    pub fn add(&mut self, book: Book, acting: UserRef) -> AppResult<()> {
        match acting {
            UserRef::Administrator(_) => {
                self.ids.observe(&book.id);
                tracing::debug!("Storing book id={}", book.id);
                self.books.push(book);
                Ok(())
            }
            UserRef::Student(_) => Err(AppError::Unauthorized(
                "Only administrators can add books".to_string(),
            )),
        }
    }

    pub fn find_by_id(&self, id: &str) -> AppResult<&Book> {
        self.books
            .iter()
            .find(|book| book.id == id)
            .ok_or_else(|| AppError::BookNotFound(format!("No book with id {}", id)))
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> AppResult<&mut Book> {
        self.books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or_else(|| AppError::BookNotFound(format!("No book with id {}", id)))
    }

    pub fn next_id(&mut self) -> AppResult<String> {
        let last = self.books.last().map(|book| book.id.as_str());
        self.ids.next(last)
    }

    /// All books in insertion order
    pub fn list(&self) -> &[Book] {
        &self.books
    }

    /// Books currently held by `student`
    pub fn borrowed_by(&self, student: StudentRef) -> impl Iterator<Item = &Book> {
        self.books
            .iter()
            .filter(move |book| book.borrowed_by == Some(student))
    }
}
