use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::user::{User, UserStore};
use super::{
    auth_dto::SignupForm,
    jwt::{create_session_token, verify_session_token},
    password::{hash_password, verify_password},
};

pub const MIN_PASSWORD_LEN: usize = 8;

pub enum SignupOutcome {
    Created { user: User, token: String },
    Rejected(Vec<String>),
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt_secret: String,
    session_hours: i64,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt_secret: String, session_hours: i64) -> Self {
        Self {
            users,
            jwt_secret,
            session_hours,
        }
    }

    /// Checks every signup rule and reports all failures together.
    pub async fn signup(&self, form: &SignupForm) -> Result<SignupOutcome> {
        let mut errors = Vec::new();

        if form.username.is_empty()
            || form.email.is_empty()
            || form.password1.is_empty()
            || form.password2.is_empty()
        {
            errors.push("All fields are required".to_string());
        }
        if form.password1 != form.password2 {
            errors.push("Passwords do not match".to_string());
        }
        if form.password1.chars().count() < MIN_PASSWORD_LEN {
            errors.push(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            ));
        }
        errors.extend(self.taken(form).await?);

        if !errors.is_empty() {
            debug!(username = %form.username, errors = errors.len(), "signup rejected");
            return Ok(SignupOutcome::Rejected(errors));
        }

        let password_hash = hash_password(&form.password1)?;
        let user = match self
            .users
            .create(&form.username, &form.email, &password_hash)
            .await
        {
            Ok(user) => user,
            Err(e) if e.is_unique_violation() => {
                // lost a race with a concurrent signup
                debug!(username = %form.username, error = %e, "signup collided on insert");
                let mut taken = self.taken(form).await?;
                if taken.is_empty() {
                    taken.push("Username already exists".to_string());
                }
                return Ok(SignupOutcome::Rejected(taken));
            }
            Err(e) => return Err(e),
        };
        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, username = %user.username, "user signed up");

        Ok(SignupOutcome::Created { user, token })
    }

    async fn taken(&self, form: &SignupForm) -> Result<Vec<String>> {
        let mut errors = Vec::new();
        if self.users.username_exists(&form.username).await? {
            errors.push("Username already exists".to_string());
        }
        if self.users.email_exists(&form.email).await? {
            errors.push("Email already registered".to_string());
        }
        Ok(errors)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(User, String)> {
        let invalid = || AppError::Authentication("Invalid username or password".to_string());

        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(invalid());
        }

        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, "user logged in");

        Ok((user, token))
    }

    /// Resolves a session token to a user that still exists.
    pub async fn session_user(&self, token: &str) -> Result<Uuid> {
        let user_id = verify_session_token(token, &self.jwt_secret)?;

        self.users
            .find_by_id(user_id)
            .await?
            .map(|user| user.id)
            .ok_or_else(|| AppError::Unauthorized("Unknown user".to_string()))
    }

    fn issue_token(&self, user: &User) -> Result<String> {
        create_session_token(user.id, &user.username, &self.jwt_secret, self.session_hours)
    }
}
