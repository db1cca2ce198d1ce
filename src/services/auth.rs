use std::sync::Arc;

use log::info;

use crate::auth::{password, TokenIssuer, Viewer, BEARER_PREFIX};
use crate::database::{self, DbPool, User};
use crate::errors::{LedgerError, LedgerResult};

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct AuthData {
    pub user_id: i64,
    pub token: String,
    pub token_expiration: i64,
    pub is_admin: bool,
    pub email: String,
}

#[derive(Debug, Clone, Default)]
pub struct PasswordChange {
    pub id: i64,
    pub password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

pub struct AuthService {
    pool: DbPool,
    tokens: Arc<TokenIssuer>,
}

impl AuthService {
    pub fn new(pool: DbPool, tokens: Arc<TokenIssuer>) -> Self {
        Self { pool, tokens }
    }

    /// The first user ever created becomes the admin.
    pub fn create_user(&self, email: &str, plain: &str) -> LedgerResult<User> {
        let email = email.trim();
        if email.is_empty() || plain.is_empty() {
            return Err(LedgerError::validation("email and password are required"));
        }

        let hashword = password::hash(plain)?;

        let conn = database::get_connection(&self.pool)?;
        if database::users::find_by_email(&conn, email)?.is_some() {
            return Err(LedgerError::conflict(format!("user {email} already exists")));
        }
        let user = database::users::insert_user(&conn, email, &hashword)?;

        info!("Created user {} (admin: {})", user.email, user.is_admin);
        Ok(user)
    }

    pub fn login(&self, email: &str, plain: &str) -> LedgerResult<AuthData> {
        let conn = database::get_connection(&self.pool)?;
        let user = database::users::find_by_email(&conn, email.trim())?
            .ok_or_else(|| LedgerError::not_found("user", email.trim()))?;

        if !password::verify(plain, &user.password_hash) {
            return Err(LedgerError::unauthorized("password is incorrect"));
        }

        let (token, _) = self.tokens.issue(&user)?;
        info!("User {} logged in", user.email);
        Ok(AuthData {
            user_id: user.id,
            token: format!("{BEARER_PREFIX}{token}"),
            token_expiration: self.tokens.ttl_secs(),
            is_admin: user.is_admin,
            email: user.email,
        })
    }

    /// Change a password. Callers may change their own; admins anyone's.
    pub fn update_user(&self, viewer: &Viewer, change: PasswordChange) -> LedgerResult<User> {
        let claims = viewer.require_auth()?;
        if claims.user_id != change.id && !claims.is_admin {
            return Err(LedgerError::unauthorized(
                "only the user or an admin may change this password",
            ));
        }

        let conn = database::get_connection(&self.pool)?;
        let user = database::users::find_by_id(&conn, change.id)?
            .ok_or_else(|| LedgerError::not_found("user", change.id))?;

        if !password::verify(&change.password, &user.password_hash) {
            return Err(LedgerError::validation("current password is incorrect"));
        }
        if change.new_password.is_empty() {
            return Err(LedgerError::validation("new password is required"));
        }
        if change.new_password != change.confirm_new_password {
            return Err(LedgerError::validation("new passwords do not match"));
        }

        let hashword = password::hash(&change.new_password)?;
        database::users::update_password(&conn, user.id, &hashword)?;

        info!("Updated password of user {}", user.email);
        Ok(User {
            password_hash: hashword,
            ..user
        })
    }
}
