//! Password hashing, access tokens and the per-request caller identity.
pub mod password;
pub mod token;

pub use token::{Claims, TokenIssuer, BEARER_PREFIX};

use crate::errors::{LedgerError, LedgerResult};

/// Who is making the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Viewer {
    #[default]
    Anonymous,
    Authenticated(Claims),
}

impl Viewer {
    /// Resolve the caller from an `Authorization` header value. Invalid or
    /// expired tokens make the caller anonymous.
    pub fn from_header(tokens: &TokenIssuer, header: Option<&str>) -> Self {
        let Some(value) = header.map(str::trim).filter(|v| !v.is_empty()) else {
            return Viewer::Anonymous;
        };

        match tokens.decode(value) {
            Ok(claims) => Viewer::Authenticated(claims),
            Err(e) => {
                log::debug!("Rejected token: {e:#}");
                Viewer::Anonymous
            }
        }
    }

    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Viewer::Authenticated(claims) => Some(claims),
            Viewer::Anonymous => None,
        }
    }

    pub fn require_auth(&self) -> LedgerResult<&Claims> {
        self.claims()
            .ok_or_else(|| LedgerError::unauthorized("a valid token is required"))
    }

    pub fn require_admin(&self) -> LedgerResult<&Claims> {
        let claims = self.require_auth()?;
        if !claims.is_admin {
            return Err(LedgerError::unauthorized("admin privileges are required"));
        }
        Ok(claims)
    }
}
