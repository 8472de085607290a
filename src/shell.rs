//! Interactive text menu over the management service.
//!
//! The shell only reads fields, calls [`Services`] and prints what comes
//! back. It works on any reader and writer so it can be driven from tests.

use std::io::{self, BufRead, Write};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookQuery, CreateBook},
        loan::LoanQuery,
        session::SessionState,
        user::RegisterUser,
    },
    services::Services,
};

const LOGGED_OUT_MENU: &str = "1. Register\n2. Login\n3. Signout\n0. Exit";
const STUDENT_MENU: &str = "1. Borrow Book\n2. Return Book\n3. Search Book\n4. List Books\n5. My Books\n6. My Loans\n7. Overdue Loans\n8. Signout\n0. Exit";
const ADMIN_MENU: &str = "1. Add Book\n2. Search Book\n3. List Books\n4. Deactivate User\n5. Loans\n6. Overdue Loans\n7. Signout\n0. Exit";

pub struct Shell<R, W> {
    services: Services,
    input: R,
    output: W,
}

/// Whether the loop keeps going after a command
enum Flow {
    Continue,
    Exit,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(services: Services, input: R, output: W) -> Self {
        Self {
            services,
            input,
            output,
        }
    }

    /// Run until the user exits or input ends
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            let state = self.services.current_session();
            let menu = match state {
                SessionState::LoggedOut => LOGGED_OUT_MENU,
                SessionState::LoggedInAsStudent => STUDENT_MENU,
                SessionState::LoggedInAsAdministrator => ADMIN_MENU,
            };
            writeln!(self.output, "\n{}", menu)?;

            let Some(choice) = self.prompt("Choice")? else {
                break;
            };
            let flow = match state {
                SessionState::LoggedOut => self.logged_out_command(&choice)?,
                SessionState::LoggedInAsStudent => self.student_command(&choice)?,
                SessionState::LoggedInAsAdministrator => self.admin_command(&choice)?,
            };
            if let Flow::Exit = flow {
                break;
            }
        }
        self.output.flush()
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn into_parts(self) -> (Services, W) {
        (self.services, self.output)
    }

    fn logged_out_command(&mut self, choice: &str) -> io::Result<Flow> {
        match choice {
            "0" => return Ok(Flow::Exit),
            "1" => {
                let Some([name, email, password, role]) =
                    self.prompt_fields(["Name", "Email", "Password", "Role (admin/student)"])?
                else {
                    return Ok(Flow::Exit);
                };
                let result = self.services.register(
                    RegisterUser {
                        name,
                        email,
                        password,
                    },
                    role.as_str(),
                );
                self.report(result, |id| format!("Registered successfully with id {}.", id))?;
            }
            "2" => {
                let Some([email, password, role]) =
                    self.prompt_fields(["Email", "Password", "Role (admin/student)"])?
                else {
                    return Ok(Flow::Exit);
                };
                let result = self.services.login(&email, &password, role.as_str());
                self.report(result, |profile| format!("Logged in successfully as {}.", profile.name))?;
            }
            "3" => self.sign_out()?,
            _ => writeln!(self.output, "Invalid choice.")?,
        }
        Ok(Flow::Continue)
    }

    fn student_command(&mut self, choice: &str) -> io::Result<Flow> {
        match choice {
            "0" => return Ok(Flow::Exit),
            "1" => {
                let Some([id]) = self.prompt_fields(["Book id"])? else {
                    return Ok(Flow::Exit);
                };
                let result = self.services.borrow(&id);
                self.report(result, |loan| {
                    format!(
                        "Book with id {} has been borrowed, due {}.",
                        id,
                        loan.due_at.format("%Y-%m-%d")
                    )
                })?;
            }
            "2" => {
                let Some([id]) = self.prompt_fields(["Book id"])? else {
                    return Ok(Flow::Exit);
                };
                let result = self.services.return_book(&id);
                self.report(result, |_| format!("Book with id {} has been returned.", id))?;
            }
            "3" => return self.search(),
            "4" => return self.list(),
            "5" => {
                let result = self.services.borrowed_books().and_then(to_json);
                self.report(result, |json| json)?;
            }
            "6" => {
                let result = self.services.loans(&LoanQuery::default()).and_then(to_json);
                self.report(result, |json| json)?;
            }
            "7" => self.overdue()?,
            "8" => self.sign_out()?,
            _ => writeln!(self.output, "Invalid choice.")?,
        }
        Ok(Flow::Continue)
    }

    fn admin_command(&mut self, choice: &str) -> io::Result<Flow> {
        match choice {
            "0" => return Ok(Flow::Exit),
            "1" => {
                let Some([name, isbn, author, category, price, storage_path, available]) = self
                    .prompt_fields([
                        "Name",
                        "ISBN",
                        "Author",
                        "Category",
                        "Price",
                        "Storage path",
                        "Available (y/n)",
                    ])?
                else {
                    return Ok(Flow::Exit);
                };
                let result = parse_price(&price).and_then(|price| {
                    self.services.add_book(CreateBook {
                        name,
                        isbn,
                        author,
                        category,
                        price,
                        storage_path,
                        available: parse_yes(&available),
                    })
                });
                self.report(result, |id| format!("Book added with id {}.", id))?;
            }
            "2" => return self.search(),
            "3" => return self.list(),
            "4" => {
                let Some([id, role]) = self.prompt_fields(["User id", "Role (admin/student)"])? else {
                    return Ok(Flow::Exit);
                };
                let result = self.services.deactivate_user(&id, role.as_str());
                self.report(result, |_| format!("User {} deactivated.", id))?;
            }
            "5" => {
                let Some([returned, book_name]) =
                    self.prompt_fields(["Returned (y/n, blank for all)", "Book name contains"])?
                else {
                    return Ok(Flow::Exit);
                };
                let query = LoanQuery {
                    returned: (!returned.trim().is_empty()).then(|| parse_yes(&returned)),
                    book_name: non_blank(book_name),
                };
                let result = self.services.loans(&query).and_then(to_json);
                self.report(result, |json| json)?;
            }
            "6" => self.overdue()?,
            "7" => self.sign_out()?,
            _ => writeln!(self.output, "Invalid choice.")?,
        }
        Ok(Flow::Continue)
    }

    fn search(&mut self) -> io::Result<Flow> {
        let Some([id]) = self.prompt_fields(["Book id"])? else {
            return Ok(Flow::Exit);
        };
        let result = self.services.search_book(&id);
        self.report(result, |name| format!("Found: {}", name))?;
        Ok(Flow::Continue)
    }

    fn list(&mut self) -> io::Result<Flow> {
        let Some([title, author]) = self.prompt_fields(["Title contains", "Author contains"])? else {
            return Ok(Flow::Exit);
        };
        let query = BookQuery {
            title: non_blank(title),
            author: non_blank(author),
        };
        let result = to_json(self.services.list_books(&query));
        self.report(result, |json| json)?;
        Ok(Flow::Continue)
    }

    fn overdue(&mut self) -> io::Result<()> {
        let result = self.services.overdue_loans().and_then(to_json);
        self.report(result, |json| json)
    }

    fn sign_out(&mut self) -> io::Result<()> {
        self.services.logout();
        writeln!(self.output, "Signed out.")
    }

    fn report<T, F>(&mut self, result: AppResult<T>, on_success: F) -> io::Result<()>
    where
        F: FnOnce(T) -> String,
    {
        match result {
            Ok(value) => writeln!(self.output, "{}", on_success(value)),
            Err(e) => writeln!(self.output, "Error [{}]: {}", e.code() as u32, e),
        }
    }

    /// Read one value per label; `None` once input is exhausted
    fn prompt_fields<const N: usize>(&mut self, labels: [&str; N]) -> io::Result<Option<[String; N]>> {
        let mut values: [String; N] = std::array::from_fn(|_| String::new());
        for (value, label) in values.iter_mut().zip(labels) {
            match self.prompt(label)? {
                Some(line) => *value = line,
                None => return Ok(None),
            }
        }
        Ok(Some(values))
    }

    /// Read one line; lines that are not valid UTF-8 are reported and asked again
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        loop {
            write!(self.output, "{}: ", label)?;
            self.output.flush()?;

            let mut raw = Vec::new();
            if self.input.read_until(b'\n', &mut raw)? == 0 {
                return Ok(None);
            }
            match String::from_utf8(raw) {
                Ok(line) => return Ok(Some(line.trim_end_matches(['\r', '\n']).to_string())),
                Err(_) => writeln!(self.output, "Input is not valid UTF-8, please try again.")?,
            }
        }
    }
}

fn to_json<T: serde::Serialize>(value: T) -> AppResult<String> {
    serde_json::to_string_pretty(&value)
        .map_err(|e| AppError::InvalidArgument(format!("Cannot render result: {}", e)))
}

fn parse_price(s: &str) -> AppResult<f64> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| AppError::InvalidArgument(format!("'{}' is not a valid price", s)))
}

fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn parse_yes(s: &str) -> bool {
    matches!(s.trim().to_lowercase().as_str(), "y" | "yes" | "true" | "1")
}
