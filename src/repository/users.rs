//! Users repository: administrator and student collections

use crate::{
    config::IdStrategy,
    error::{AppError, AppResult},
    models::user::{Account, AdminRef, Role, StudentRef, User, UserRef},
};

use super::IdSequence;

#[derive(Debug, Clone)]
pub struct UsersRepository {
    administrators: Vec<Account>,
    students: Vec<Account>,
    strategy: IdStrategy,
    admin_ids: IdSequence,
    student_ids: IdSequence,
}

impl UsersRepository {
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            administrators: Vec::new(),
            students: Vec::new(),
            strategy,
            admin_ids: IdSequence::new(strategy),
            student_ids: IdSequence::new(strategy),
        }
    }

    /// Insert a user into the collection matching its role
    pub fn add(&mut self, user: User) -> UserRef {
        match user {
            User::Administrator(account) => {
                self.admin_ids.observe(&account.user_id);
                tracing::debug!("Storing administrator id={}", account.user_id);
                self.administrators.push(account);
                UserRef::Administrator(AdminRef(self.administrators.len() - 1))
            }
            User::Student(account) => {
                self.student_ids.observe(&account.user_id);
                tracing::debug!("Storing student id={}", account.user_id);
                self.students.push(account);
                UserRef::Student(StudentRef(self.students.len() - 1))
            }
        }
    }

    /// Resolve a handle to its record, active or not
    pub fn get(&self, user: UserRef) -> AppResult<&Account> {
        let found = match user {
            UserRef::Administrator(AdminRef(index)) => self.administrators.get(index),
            UserRef::Student(StudentRef(index)) => self.students.get(index),
        };
        found.ok_or_else(|| AppError::UserNotFound(format!("No user record for {:?}", user)))
    }

    /// First active user of `role` with the given id
    pub fn find_by_id(&self, user_id: &str, role: Role) -> AppResult<UserRef> {
        self.find_active(role, |account| account.user_id == user_id)
            .ok_or_else(|| AppError::UserNotFound(format!("No active {} with id {}", role, user_id)))
    }

    /// First active user of `role` with the given email
    pub fn find_by_email(&self, email: &str, role: Role) -> AppResult<UserRef> {
        self.find_active(role, |account| account.email == email)
            .ok_or_else(|| AppError::UserNotFound(format!("No active {} with email {}", role, email)))
    }

    /// Soft-delete the first active user of `role` with the given id.
    /// The record stays in its collection.
    pub fn deactivate(&mut self, user_id: &str, role: Role) -> AppResult<UserRef> {
        let user = self.find_by_id(user_id, role)?;
        let account = match user {
            UserRef::Administrator(AdminRef(index)) => self.administrators.get_mut(index),
            UserRef::Student(StudentRef(index)) => self.students.get_mut(index),
        };
        if let Some(account) = account {
            account.deactivate();
        }
        tracing::debug!("Deactivated {} id={}", role, user_id);
        Ok(user)
    }

    /// Next id for a user registering under `role`.
    ///
    /// With the counter strategy each role has its own sequence. The
    /// last-inserted strategy always reads the student collection.
    pub fn next_id(&mut self, role: Role) -> AppResult<String> {
        let last_student = self.students.last().map(|account| account.user_id.as_str());
        match (self.strategy, role) {
            (IdStrategy::Counter, Role::Administrator) => self.admin_ids.next(None),
            (IdStrategy::Counter, Role::Student) => self.student_ids.next(None),
            (IdStrategy::LastInserted, _) => self.student_ids.next(last_student),
        }
    }

    /// Every record of `role` in insertion order, including deactivated ones
    pub fn collection(&self, role: Role) -> &[Account] {
        match role {
            Role::Administrator => &self.administrators,
            Role::Student => &self.students,
        }
    }

    fn find_active<F>(&self, role: Role, predicate: F) -> Option<UserRef>
    where
        F: Fn(&Account) -> bool,
    {
        let position = self
            .collection(role)
            .iter()
            .position(|account| account.active && predicate(account))?;
        Some(match role {
            Role::Administrator => UserRef::Administrator(AdminRef(position)),
            Role::Student => UserRef::Student(StudentRef(position)),
        })
    }
}
