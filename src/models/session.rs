//! Login session state machine

use serde::Serialize;

use super::user::{Role, UserRef};

/// Observable session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    LoggedOut,
    LoggedInAsAdministrator,
    LoggedInAsStudent,
}

/// The single identity currently logged in, if any
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<UserRef>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        match self.identity.map(|user| user.role()) {
            None => SessionState::LoggedOut,
            Some(Role::Administrator) => SessionState::LoggedInAsAdministrator,
            Some(Role::Student) => SessionState::LoggedInAsStudent,
        }
    }

    pub fn identity(&self) -> Option<UserRef> {
        self.identity
    }

    pub fn log_in(&mut self, user: UserRef) {
        self.identity = Some(user);
    }

    /// Idempotent
    pub fn log_out(&mut self) {
        self.identity = None;
    }
}
