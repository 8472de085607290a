//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role a user is registered under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrator,
    Student,
}

impl Role {
    /// Map a caller supplied role string. Only a case-insensitive `admin`
    /// selects the administrator role; every other value means student.
    pub fn from_role_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("admin") {
            Role::Administrator
        } else {
            Role::Student
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "admin",
            Role::Student => "student",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Role::from_role_str(s)
    }
}

/// Fields shared by every user record
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub user_id: String,
    pub name: String,
    pub email: String,
    /// Compared verbatim on login
    #[serde(skip_serializing)]
    pub password: String,
    pub active: bool,
    pub registered_at: DateTime<Utc>,
}

impl Account {
    pub fn new(user_id: String, register: RegisterUser) -> Self {
        Self {
            user_id,
            name: register.name,
            email: register.email,
            password: register.password,
            active: true,
            registered_at: Utc::now(),
        }
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Exact match against the stored password
    pub fn password_matches(&self, password: &str) -> bool {
        self.password == password
    }
}

/// A user value ready for insertion, tagged by role
#[derive(Debug, Clone)]
pub enum User {
    Administrator(Account),
    Student(Account),
}

impl User {
    pub fn new(role: Role, account: Account) -> Self {
        match role {
            Role::Administrator => User::Administrator(account),
            Role::Student => User::Student(account),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            User::Administrator(_) => Role::Administrator,
            User::Student(_) => Role::Student,
        }
    }

    pub fn account(&self) -> &Account {
        match self {
            User::Administrator(account) | User::Student(account) => account,
        }
    }
}

/// Position of an administrator record in its collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdminRef(pub(crate) usize);

/// Position of a student record in its collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StudentRef(pub(crate) usize);

/// Handle to a stored user record.
///
/// Records are never removed from their collection, so a handle stays valid
/// for the lifetime of the store and two handles are equal only when they
/// designate the same record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserRef {
    Administrator(AdminRef),
    Student(StudentRef),
}

impl UserRef {
    pub fn role(&self) -> Role {
        match self {
            UserRef::Administrator(_) => Role::Administrator,
            UserRef::Student(_) => Role::Student,
        }
    }

    pub fn as_student(&self) -> Option<StudentRef> {
        match self {
            UserRef::Student(student) => Some(*student),
            UserRef::Administrator(_) => None,
        }
    }
}

/// Registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Public view of a user, without credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl UserProfile {
    pub fn new(account: &Account, role: Role) -> Self {
        Self {
            user_id: account.user_id.clone(),
            name: account.name.clone(),
            email: account.email.clone(),
            role,
        }
    }
}
