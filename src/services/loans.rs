//! Borrowing and returning books

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::BookShort,
        loan::{Loan, LoanQuery},
        user::UserRef,
    },
};

use super::{require_book_id, Services};

impl Services {
    /// Borrow a book as the logged-in student and open a loan for it.
    ///
    /// A book held by anyone, the caller included, cannot be borrowed again.
    /// The administrator `available` flag is not consulted.
    pub fn borrow(&mut self, book_id: &str) -> AppResult<Loan> {
        let student = self.require_student("borrow books")?;
        require_book_id(book_id)?;

        let book = self.repository.books.find_by_id(book_id)?;
        if book.is_borrowed() {
            tracing::warn!("Book id={} is already borrowed", book_id);
            return Err(AppError::AlreadyBorrowed(book_id.to_string()));
        }
        let book_name = book.name.clone();
        let borrower = self.repository.users.get(UserRef::Student(student))?;

        let now = Utc::now();
        let loan = Loan {
            id: self.repository.loans.next_id()?,
            book_id: book_id.to_string(),
            book_name,
            student,
            borrower_id: borrower.user_id.clone(),
            borrower_email: borrower.email.clone(),
            borrowed_at: now,
            due_at: now + self.loan_duration,
            returned_at: None,
        };
        self.repository.loans.create(loan.clone())?;
        self.repository.books.find_by_id_mut(book_id)?.lend_to(student, now);

        tracing::info!("Book id={} borrowed by student id={} (loan {})", book_id, loan.borrower_id, loan.id);
        Ok(loan)
    }

    /// Return a book held by the logged-in student and close its loan
    pub fn return_book(&mut self, book_id: &str) -> AppResult<()> {
        let student = self.require_student("return books")?;
        require_book_id(book_id)?;

        let book = self.repository.books.find_by_id_mut(book_id)?;
        // Same record, not merely the same user id
        if book.borrowed_by != Some(student) {
            tracing::warn!("Book id={} is not held by student {:?}", book_id, student);
            return Err(AppError::NotBorrowedByCaller(book_id.to_string()));
        }
        book.take_back();

        // The book record is authoritative; a book lent outside the service has no loan
        if let Err(e) = self.repository.loans.return_loan(book_id, student, Utc::now()) {
            tracing::warn!("No open loan recorded for book id={}: {}", book_id, e);
        }

        tracing::info!("Book id={} returned by student {:?}", book_id, student);
        Ok(())
    }

    /// Books the logged-in student currently holds
    pub fn borrowed_books(&self) -> AppResult<Vec<BookShort>> {
        let student = self.require_student("list borrowed books")?;
        Ok(self
            .repository
            .books
            .borrowed_by(student)
            .map(BookShort::from)
            .collect())
    }

    /// Loan history: every loan for administrators, their own for students
    pub fn loans(&self, query: &LoanQuery) -> AppResult<Vec<Loan>> {
        let user = self.require_logged_in("list loans")?;
        Ok(self
            .visible_loans(user)
            .filter(|loan| query.matches(loan))
            .cloned()
            .collect())
    }

    /// Open loans past their due date, scoped like [`Services::loans`]
    pub fn overdue_loans(&self) -> AppResult<Vec<Loan>> {
        self.overdue_loans_at(Utc::now())
    }

    fn overdue_loans_at(&self, now: DateTime<Utc>) -> AppResult<Vec<Loan>> {
        let user = self.require_logged_in("list overdue loans")?;
        Ok(self
            .visible_loans(user)
            .filter(|loan| loan.is_overdue(now))
            .cloned()
            .collect())
    }

    fn visible_loans(&self, user: UserRef) -> Box<dyn Iterator<Item = &Loan> + '_> {
        match user {
            UserRef::Administrator(_) => Box::new(self.repository.loans.list().iter()),
            UserRef::Student(student) => Box::new(self.repository.loans.for_student(student)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::IdStrategy,
        models::{
            book::CreateBook,
            user::{Account, RegisterUser, User},
        },
        repository::Repository,
    };

    fn register(services: &mut Services, name: &str, role: &str) {
        services
            .register(
                RegisterUser {
                    name: name.to_string(),
                    email: format!("{}@lib.org", name.to_lowercase()),
                    password: "pw".to_string(),
                },
                role,
            )
            .unwrap();
    }

    fn login(services: &mut Services, name: &str, role: &str) {
        services
            .login(&format!("{}@lib.org", name.to_lowercase()), "pw", role)
            .unwrap();
    }

    fn catalog(strategy: IdStrategy) -> Services {
        let mut services = Services::with_repository(Repository::new(strategy));
        register(&mut services, "Root", "admin");
        register(&mut services, "Alice", "student");
        register(&mut services, "Bob", "student");

        login(&mut services, "Root", "admin");
        services
            .add_book(CreateBook {
                name: "Dune".to_string(),
                isbn: "9780441013593".to_string(),
                author: "Frank Herbert".to_string(),
                category: "Science fiction".to_string(),
                price: 9.99,
                storage_path: "shelf/a/3".to_string(),
                available: false,
            })
            .unwrap();
        services.logout();
        services
    }

    #[test]
    fn test_borrow_sets_borrower() {
        let mut services = catalog(IdStrategy::Counter);
        login(&mut services, "Alice", "student");

        // Availability metadata does not block borrowing
        services.borrow("1").unwrap();
        let book = services.get_book("1").unwrap();
        assert!(book.is_borrowed());
        assert!(book.borrowed_at.is_some());
        assert_eq!(services.borrowed_books().unwrap().len(), 1);
    }

    #[test]
    fn test_second_borrow_rejected() {
        let mut services = catalog(IdStrategy::Counter);
        login(&mut services, "Alice", "student");
        services.borrow("1").unwrap();
        assert_eq!(services.borrow("1").unwrap_err(), AppError::AlreadyBorrowed("1".to_string()));

        login(&mut services, "Bob", "student");
        assert_eq!(services.borrow("1").unwrap_err(), AppError::AlreadyBorrowed("1".to_string()));
        assert!(services.borrowed_books().unwrap().is_empty());
    }

    #[test]
    fn test_return_by_other_student_rejected() {
        let mut services = catalog(IdStrategy::Counter);
        login(&mut services, "Alice", "student");
        services.borrow("1").unwrap();

        login(&mut services, "Bob", "student");
        assert_eq!(
            services.return_book("1"),
            Err(AppError::NotBorrowedByCaller("1".to_string()))
        );
        assert!(services.get_book("1").unwrap().is_borrowed());

        login(&mut services, "Alice", "student");
        services.return_book("1").unwrap();
        assert!(!services.get_book("1").unwrap().is_borrowed());
        assert_eq!(
            services.return_book("1"),
            Err(AppError::NotBorrowedByCaller("1".to_string()))
        );
    }

    #[test]
    fn test_return_compares_record_identity() {
        // Two student records sharing an id are still different borrowers
        let mut repository = Repository::new(IdStrategy::Counter);
        for name in ["Alice", "Twin"] {
            repository.users.add(User::Student(Account::new(
                "1".to_string(),
                RegisterUser {
                    name: name.to_string(),
                    email: format!("{}@lib.org", name.to_lowercase()),
                    password: "pw".to_string(),
                },
            )));
        }
        let mut services = Services::with_repository(repository);
        register(&mut services, "Root", "admin");
        login(&mut services, "Root", "admin");
        services
            .add_book(CreateBook {
                name: "Emma".to_string(),
                isbn: String::new(),
                author: "Jane Austen".to_string(),
                category: "Novel".to_string(),
                price: 5.0,
                storage_path: String::new(),
                available: true,
            })
            .unwrap();

        login(&mut services, "Alice", "student");
        services.borrow("1").unwrap();

        login(&mut services, "Twin", "student");
        assert_eq!(
            services.return_book("1"),
            Err(AppError::NotBorrowedByCaller("1".to_string()))
        );

        login(&mut services, "Alice", "student");
        assert!(services.return_book("1").is_ok());
    }

    #[test]
    fn test_administrator_cannot_borrow_or_return() {
        let mut services = catalog(IdStrategy::Counter);
        login(&mut services, "Root", "admin");
        assert!(matches!(services.borrow("1"), Err(AppError::Unauthorized(_))));
        assert!(matches!(services.return_book("1"), Err(AppError::Unauthorized(_))));
        assert!(matches!(services.borrowed_books(), Err(AppError::Unauthorized(_))));
        assert!(!services.get_book("1").unwrap().is_borrowed());
    }

    #[test]
    fn test_logged_out_cannot_borrow() {
        let mut services = catalog(IdStrategy::Counter);
        assert!(matches!(services.borrow("1"), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_missing_and_blank_ids() {
        let mut services = catalog(IdStrategy::Counter);
        login(&mut services, "Alice", "student");
        assert!(matches!(services.borrow("9"), Err(AppError::BookNotFound(_))));
        assert!(matches!(services.return_book(""), Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn test_borrow_and_return_keep_loan_history() {
        let mut services = catalog(IdStrategy::Counter);
        login(&mut services, "Alice", "student");
        let loan = services.borrow("1").unwrap();
        assert_eq!(loan.id, "1");
        assert_eq!(loan.borrower_email, "alice@lib.org");
        assert_eq!(loan.due_at - loan.borrowed_at, chrono::Duration::days(14));
        services.return_book("1").unwrap();

        login(&mut services, "Bob", "student");
        services.borrow("1").unwrap();
        let mine = services.loans(&LoanQuery::default()).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].borrower_email, "bob@lib.org");
        assert!(mine[0].is_open());

        login(&mut services, "Root", "admin");
        let all = services.loans(&LoanQuery::default()).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].returned_at.is_some());
        let returned = services
            .loans(&LoanQuery {
                returned: Some(true),
                book_name: Some("dune".to_string()),
            })
            .unwrap();
        assert_eq!(returned.len(), 1);
        assert_eq!(returned[0].borrower_email, "alice@lib.org");
    }

    #[test]
    fn test_rejected_return_leaves_loan_open() {
        let mut services = catalog(IdStrategy::Counter);
        login(&mut services, "Alice", "student");
        services.borrow("1").unwrap();
        login(&mut services, "Bob", "student");
        assert!(services.return_book("1").is_err());

        login(&mut services, "Root", "admin");
        assert!(services.loans(&LoanQuery::default()).unwrap()[0].is_open());
    }

    #[test]
    fn test_overdue_loans_are_scoped_by_role() {
        let mut services = catalog(IdStrategy::Counter).with_loan_duration(chrono::Duration::days(7));
        login(&mut services, "Alice", "student");
        services.borrow("1").unwrap();

        let later = Utc::now() + chrono::Duration::days(8);
        assert!(services.overdue_loans().unwrap().is_empty());
        assert_eq!(services.overdue_loans_at(later).unwrap().len(), 1);

        login(&mut services, "Bob", "student");
        assert!(services.overdue_loans_at(later).unwrap().is_empty());

        login(&mut services, "Root", "admin");
        assert_eq!(services.overdue_loans_at(later).unwrap()[0].borrower_email, "alice@lib.org");

        services.logout();
        assert!(matches!(services.loans(&LoanQuery::default()), Err(AppError::Unauthorized(_))));
        assert!(matches!(services.overdue_loans(), Err(AppError::Unauthorized(_))));
    }
}
