//! Record store: in-memory collections of users and books.
//!
//! Lookups are linear scans in insertion order. The catalog is small and
//! lives in memory for one run; an index by id or email would be the next
//! step for larger collections, without changing these signatures.

pub mod books;
pub mod loans;
pub mod users;

use crate::{
    config::IdStrategy,
    error::{AppError, AppResult},
};

/// Main repository struct holding every collection
#[derive(Debug, Clone)]
pub struct Repository {
    pub users: users::UsersRepository,
    pub books: books::BooksRepository,
    pub loans: loans::LoansRepository,
}

impl Repository {
    /// Create an empty store using the given id strategy
    pub fn new(id_strategy: IdStrategy) -> Self {
        Self {
            users: users::UsersRepository::new(id_strategy),
            books: books::BooksRepository::new(id_strategy),
            loans: loans::LoansRepository::new(id_strategy),
        }
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new(IdStrategy::default())
    }
}

/// Source of decimal string ids for one collection
#[derive(Debug, Clone)]
pub(crate) struct IdSequence {
    strategy: IdStrategy,
    issued: u64,
}

impl IdSequence {
    pub(crate) fn new(strategy: IdStrategy) -> Self {
        Self { strategy, issued: 0 }
    }

    /// Produce the next id. `last_inserted` is the id of the most recently
    /// inserted record of the collection the legacy scheme reads from.
    pub(crate) fn next(&mut self, last_inserted: Option<&str>) -> AppResult<String> {
        match self.strategy {
            IdStrategy::Counter => {
                self.issued = self
                    .issued
                    .checked_add(1)
                    .ok_or_else(|| AppError::InvalidArgument("Id counter exhausted".to_string()))?;
                Ok(self.issued.to_string())
            }
            IdStrategy::LastInserted => match last_inserted {
                None => Ok("1".to_string()),
                Some(last) => {
                    let n = last
                        .parse::<u64>()
                        .map_err(|_| AppError::InvalidArgument(format!("Stored id '{}' is not numeric", last)))?;
                    n.checked_add(1)
                        .map(|next| next.to_string())
                        .ok_or_else(|| AppError::InvalidArgument(format!("No id left after '{}'", last)))
                }
            },
        }
    }

    /// Account for an id stored by the caller so the counter never hands it out again
    pub(crate) fn observe(&mut self, id: &str) {
        if let Ok(n) = id.parse::<u64>() {
            self.issued = self.issued.max(n);
        }
    }
}
