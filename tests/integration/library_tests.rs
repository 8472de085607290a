//! End-to-end tests through the public catalog API

use catalog_core::{
    config::{CatalogConfig, IdStrategy},
    error::AppError,
    models::{Account, BookQuery, CreateBook, LoanQuery, RegisterUser, Role, SessionState, User},
    repository::Repository,
    shell::Shell,
    Services,
};

fn register(services: &mut Services, name: &str, role: &str) -> String {
    services
        .register(
            RegisterUser {
                name: name.to_string(),
                email: format!("{}@lib.org", name.to_lowercase()),
                password: format!("{}-pw", name.to_lowercase()),
            },
            role,
        )
        .expect("registration failed")
}

fn login(services: &mut Services, name: &str, role: &str) {
    services
        .login(
            &format!("{}@lib.org", name.to_lowercase()),
            &format!("{}-pw", name.to_lowercase()),
            role,
        )
        .expect("login failed");
}

fn book(name: &str) -> CreateBook {
    CreateBook {
        name: name.to_string(),
        isbn: "9780441013593".to_string(),
        author: "Frank Herbert".to_string(),
        category: "Science fiction".to_string(),
        price: 9.99,
        storage_path: "/books/dune.pdf".to_string(),
        available: true,
    }
}

#[test]
fn test_borrow_return_scenario() {
    let mut services = Services::new(&CatalogConfig::default());

    assert_eq!(register(&mut services, "Alice", "student"), "1");
    assert_eq!(register(&mut services, "Bob", "student"), "2");
    register(&mut services, "Root", "admin");

    login(&mut services, "Root", "admin");
    assert_eq!(services.add_book(book("Dune")).unwrap(), "1");
    services.logout();

    login(&mut services, "Alice", "student");
    assert!(services.borrow("1").is_ok());

    login(&mut services, "Bob", "student");
    assert_eq!(services.borrow("1").unwrap_err(), AppError::AlreadyBorrowed("1".to_string()));

    login(&mut services, "Alice", "student");
    assert!(services.return_book("1").is_ok());

    login(&mut services, "Bob", "student");
    assert!(services.borrow("1").is_ok());
    assert_eq!(services.borrowed_books().unwrap()[0].name, "Dune");
    assert_eq!(services.current_user().unwrap().name, "Bob");
}

#[test]
fn test_roles_are_enforced() {
    let mut services = Services::new(&CatalogConfig::default());
    register(&mut services, "Root", "admin");
    register(&mut services, "Alice", "student");

    login(&mut services, "Alice", "student");
    assert!(matches!(services.add_book(book("Dune")), Err(AppError::Unauthorized(_))));

    login(&mut services, "Root", "Admin");
    assert_eq!(services.current_session(), SessionState::LoggedInAsAdministrator);
    services.add_book(book("Dune")).unwrap();
    assert!(matches!(services.borrow("1"), Err(AppError::Unauthorized(_))));
    assert!(matches!(services.return_book("1"), Err(AppError::Unauthorized(_))));

    services.logout();
    assert_eq!(services.search_book("1").unwrap(), "Dune");
}

#[test]
fn test_legacy_ids_after_deactivation() {
    let config = CatalogConfig {
        id_strategy: IdStrategy::LastInserted,
        ..Default::default()
    };
    let mut services = Services::new(&config);
    register(&mut services, "Alice", "student");
    register(&mut services, "Bob", "student");
    // Administrator ids follow the student collection
    assert_eq!(register(&mut services, "Root", "admin"), "3");

    login(&mut services, "Root", "admin");
    services.deactivate_user("2", Role::Student).unwrap();

    let users = &services.repository().users;
    assert!(users.find_by_id("2", Role::Student).unwrap_err().is_not_found());
    assert_eq!(users.collection(Role::Student).len(), 2);

    // The last inserted record still drives the sequence
    assert_eq!(register(&mut services, "Carol", "student"), "3");
}

#[test]
fn test_counter_ids_after_deactivation() {
    let mut services = Services::new(&CatalogConfig::default());
    register(&mut services, "Alice", "student");
    register(&mut services, "Bob", "student");
    assert_eq!(register(&mut services, "Root", "admin"), "1");

    login(&mut services, "Root", "admin");
    services.deactivate_user("2", Role::Student).unwrap();
    assert_eq!(register(&mut services, "Carol", "student"), "3");
}

#[test]
fn test_shell_session() {
    let script = [
        "1", "Root", "root@lib.org", "pw", "admin",
        "1", "Alice", "alice@lib.org", "pw", "student",
        "2", "root@lib.org", "pw", "admin",
        "1", "Dune", "isbn", "Frank Herbert", "SF", "9.5", "/dune", "y",
        "7",
        "2", "alice@lib.org", "pw", "student",
        "1", "1",
        "1", "1",
        "5",
        "0",
    ]
    .join("\n");

    let mut shell = Shell::new(Services::default(), script.as_bytes(), Vec::new());
    shell.run().unwrap();
    let (services, output) = shell.into_parts();
    let output = String::from_utf8(output).unwrap();

    assert!(output.contains("Book added with id 1."));
    assert!(output.contains("Book with id 1 has been borrowed, due "));
    assert!(output.contains("Error [7]: Book 1 is already borrowed"));
    assert!(output.contains("\"name\": \"Dune\""));
    assert_eq!(services.current_session(), SessionState::LoggedInAsStudent);
}

#[test]
fn test_registration_after_seeded_records() {
    let mut repository = Repository::default();
    repository.users.add(User::Student(Account::new(
        "1".to_string(),
        RegisterUser {
            name: "Seed".to_string(),
            email: "seed@lib.org".to_string(),
            password: "seed-pw".to_string(),
        },
    )));

    let mut services = Services::with_repository(repository);
    assert_eq!(register(&mut services, "Alice", "student"), "2");
    assert_eq!(register(&mut services, "Root", "admin"), "1");
}

#[test]
fn test_loan_history_and_listing_by_role() {
    let mut services = Services::new(&CatalogConfig::default()).with_loan_duration(chrono::Duration::days(-1));
    register(&mut services, "Root", "admin");
    register(&mut services, "Alice", "student");
    register(&mut services, "Bob", "student");

    login(&mut services, "Root", "admin");
    services.add_book(book("Dune")).unwrap();
    services.add_book(book("Dune Messiah")).unwrap();

    login(&mut services, "Alice", "student");
    services.borrow("1").unwrap();
    services.return_book("1").unwrap();
    services.borrow("2").unwrap();

    // Students only see books nobody holds
    let shelf = services.list_books(&BookQuery::default());
    assert_eq!(shelf.len(), 1);
    assert_eq!(shelf[0].id, "1");

    let history = services.loans(&LoanQuery::default()).unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].returned_at.is_some());
    assert_eq!(services.overdue_loans().unwrap().len(), 1);

    login(&mut services, "Bob", "student");
    assert!(services.loans(&LoanQuery::default()).unwrap().is_empty());
    assert!(services.overdue_loans().unwrap().is_empty());

    login(&mut services, "Root", "admin");
    let listed = services.list_books(&BookQuery::default());
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[1].borrowed_by.as_deref(), Some("alice@lib.org"));

    let open = LoanQuery {
        returned: Some(false),
        book_name: Some("messiah".to_string()),
    };
    let open_loans = services.loans(&open).unwrap();
    assert_eq!(open_loans.len(), 1);
    assert_eq!(open_loans[0].borrower_email, "alice@lib.org");

    services.logout();
    assert!(matches!(services.loans(&LoanQuery::default()), Err(AppError::Unauthorized(_))));
}
