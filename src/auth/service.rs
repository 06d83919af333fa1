//! Account signup, login and session resolution.

use std::sync::Arc;

use tracing::{debug, info};

use super::password::{hash_password, validate_password, verify_password};
use super::token::SessionTokens;
use super::validation::{validate_email, validate_name, validate_username, ValidationError};
use crate::db::{Database, NewUser, User, UserRepository};
use crate::mail::{self, templates, ClientLinks, Mailer};
use crate::{NetlinkError, Result};

/// Uniform message for every failed login.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Signup request data.
#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    /// Create a new signup request.
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Validate every field. Runs before any database lookup.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_username(&self.username)?;
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(ValidationError::Required("password").into());
        }
        validate_password(&self.password)?;
        Ok(())
    }
}

/// An authenticated user together with a fresh session token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Service for account authentication.
pub struct AuthService<'a> {
    db: &'a Database,
    tokens: &'a SessionTokens,
    welcome: Option<(Arc<dyn Mailer>, &'a ClientLinks)>,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService.
    pub fn new(db: &'a Database, tokens: &'a SessionTokens) -> Self {
        Self {
            db,
            tokens,
            welcome: None,
        }
    }

    /// Send a welcome email after each successful signup.
    pub fn with_welcome_mail(mut self, mailer: Arc<dyn Mailer>, links: &'a ClientLinks) -> Self {
        self.welcome = Some((mailer, links));
        self
    }

    /// Register a new account and open a session for it.
    ///
    /// This function:
    /// 1. Validates all input fields
    /// 2. Checks that the email and username are free
    /// 3. Hashes the password
    /// 4. Creates the user and issues a token
    pub async fn signup(&self, request: &SignupRequest) -> Result<Session> {
        request.validate()?;

        let repo = UserRepository::new(self.db.pool());
        if repo.email_exists(&request.email).await? {
            return Err(NetlinkError::Conflict("User already exists".to_string()));
        }
        if repo.username_exists(&request.username).await? {
            return Err(NetlinkError::Conflict("Username already taken".to_string()));
        }

        let password_hash = hash_password(&request.password)?;
        let user = repo
            .create(&NewUser::new(
                request.name.trim(),
                &request.username,
                &request.email,
                password_hash,
            ))
            .await?;
        info!("New user registered: {} (id={})", user.username, user.id);

        let token = self.issue(&user)?;

        if let Some((mailer, links)) = &self.welcome {
            let profile_url = links.profile(&user.username);
            mail::spawn_send(
                Arc::clone(mailer),
                templates::welcome(&user.email, &user.name, &profile_url),
            );
        }

        Ok(Session { user, token })
    }

    /// Log in with username and password.
    ///
    /// An unknown username and a wrong password fail identically.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        if username.trim().is_empty() {
            return Err(ValidationError::Required("username").into());
        }
        if password.is_empty() {
            return Err(ValidationError::Required("password").into());
        }

        let user = UserRepository::new(self.db.pool())
            .get_by_username(username)
            .await?
            .ok_or_else(|| NetlinkError::Auth(INVALID_CREDENTIALS.to_string()))?;

        verify_password(password, &user.password).map_err(|e| {
            debug!("Login failed for {}: {}", user.username, e);
            NetlinkError::Auth(INVALID_CREDENTIALS.to_string())
        })?;

        info!("User logged in: {} (id={})", user.username, user.id);
        let token = self.issue(&user)?;
        Ok(Session { user, token })
    }

    /// Resolve a session token to its user.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let claims = self
            .tokens
            .verify(token)
            .map_err(|_| NetlinkError::Auth("Unauthorized - Invalid token".to_string()))?;

        UserRepository::new(self.db.pool())
            .get_by_id(claims.sub)
            .await?
            .ok_or_else(|| NetlinkError::Auth("User not found".to_string()))
    }

    fn issue(&self, user: &User) -> Result<String> {
        self.tokens
            .issue(user.id)
            .map_err(|e| NetlinkError::Internal(e.to_string()))
    }
}
