//! Registration, authentication and account management

use crate::{
    error::{AppError, AppResult},
    models::{
        session::SessionState,
        user::{Account, RegisterUser, Role, User, UserProfile},
    },
};

use super::Services;

impl Services {
    /// Register a new user under `role` and return the assigned id.
    ///
    /// Registration never logs the caller in, and duplicate emails are accepted.
    pub fn register(&mut self, register: RegisterUser, role: impl Into<Role>) -> AppResult<String> {
        let role = role.into();
        let user_id = self.repository.users.next_id(role)?;
        let account = Account::new(user_id.clone(), register);
        self.repository.users.add(User::new(role, account));

        tracing::info!("Registered {} id={}", role, user_id);
        Ok(user_id)
    }

    /// Authenticate an active user of `role` by email and password.
    ///
    /// On failure the session is left exactly as it was.
    pub fn login(&mut self, email: &str, password: &str, role: impl Into<Role>) -> AppResult<UserProfile> {
        let role = role.into();
        let user = self.repository.users.find_by_email(email, role)?;
        let account = self.repository.users.get(user)?;

        if !account.password_matches(password) {
            tracing::warn!("Rejected login for {} {}: invalid password", role, email);
            return Err(AppError::Authentication("Invalid password".to_string()));
        }

        let profile = UserProfile::new(account, role);
        self.session.log_in(user);
        tracing::info!("Logged in {} id={}", role, profile.user_id);
        Ok(profile)
    }

    /// Clear the session; does nothing when already logged out
    pub fn logout(&mut self) {
        if self.session.state() != SessionState::LoggedOut {
            tracing::info!("Logged out");
        }
        self.session.log_out();
    }

    /// Profile of the logged-in user
    pub fn current_user(&self) -> Option<UserProfile> {
        let user = self.session.identity()?;
        let account = self.repository.users.get(user).ok()?;
        Some(UserProfile::new(account, user.role()))
    }

    /// Soft-delete a user (administrator only). Deactivating the account
    /// that is logged in ends the session.
    pub fn deactivate_user(&mut self, user_id: &str, role: impl Into<Role>) -> AppResult<()> {
        let role = role.into();
        self.require_administrator("deactivate users")?;

        let user = self.repository.users.deactivate(user_id, role)?;
        if self.session.identity() == Some(user) {
            self.session.log_out();
        }

        tracing::info!("Deactivated {} id={}", role, user_id);
        Ok(())
    }
}
