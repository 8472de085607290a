//! Management service: session handling and catalog use cases

pub mod auth;
pub mod catalog;
pub mod loans;

use chrono::Duration;

use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::{
        session::{Session, SessionState},
        user::{StudentRef, UserRef},
    },
    repository::Repository,
};

/// Owns the record store and the session of the single interactive user.
///
/// Every use case is a method taking `&self` or `&mut self`; there is no
/// process-wide state, so independent instances never interfere.
#[derive(Debug, Clone)]
pub struct Services {
    repository: Repository,
    session: Session,
    loan_duration: Duration,
}

impl Services {
    pub fn new(config: &CatalogConfig) -> Self {
        Self::with_repository(Repository::new(config.id_strategy))
            .with_loan_duration(Duration::days(config.loan_duration_days))
    }

    pub fn with_repository(repository: Repository) -> Self {
        Self {
            repository,
            session: Session::new(),
            loan_duration: Duration::days(CatalogConfig::default().loan_duration_days),
        }
    }

    /// How long a loan runs before it is overdue
    pub fn with_loan_duration(mut self, loan_duration: Duration) -> Self {
        self.loan_duration = loan_duration;
        self
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_session(&self) -> SessionState {
        self.session.state()
    }

    /// Logged-in identity of any role
    fn require_logged_in(&self, action: &str) -> AppResult<UserRef> {
        self.session
            .identity()
            .ok_or_else(|| AppError::Unauthorized(format!("Log in to {}", action)))
    }

    /// Logged-in identity, if it is an administrator
    fn require_administrator(&self, action: &str) -> AppResult<UserRef> {
        match self.session.identity() {
            Some(user @ UserRef::Administrator(_)) => Ok(user),
            Some(UserRef::Student(_)) => Err(AppError::Unauthorized(format!(
                "Students cannot {}",
                action
            ))),
            None => Err(AppError::Unauthorized(format!("Log in to {}", action))),
        }
    }

    /// Logged-in identity, if it is a student
    fn require_student(&self, action: &str) -> AppResult<StudentRef> {
        match self.session.identity() {
            Some(UserRef::Student(student)) => Ok(student),
            Some(UserRef::Administrator(_)) => Err(AppError::Unauthorized(format!(
                "Logged in as administrator, cannot {}",
                action
            ))),
            None => Err(AppError::Unauthorized(format!("Log in to {}", action))),
        }
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::with_repository(Repository::default())
    }
}

/// Reject blank book ids before touching the store
fn require_book_id(book_id: &str) -> AppResult<()> {
    if book_id.trim().is_empty() {
        return Err(AppError::InvalidArgument("Book id is required".to_string()));
    }
    Ok(())
}
