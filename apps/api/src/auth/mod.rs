//! Caller identity and quota state.
//!
//! Identity is owned by Clerk: the session token proves who the caller is and
//! which plan they are on, and the free-tier counter lives in the user's
//! private metadata. Nothing here is cached between requests.

pub mod clerk;
pub mod middleware;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::models::user::Plan;
use crate::vendor::VendorError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing session token")]
    MissingToken,

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("Identity provider error: {0}")]
    Upstream(#[from] VendorError),
}

impl AuthError {
    /// True when the caller, not the identity provider, is at fault.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, AuthError::MissingToken | AuthError::InvalidToken(_))
    }
}

/// Verified claims of a Clerk session token.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionClaims {
    /// Clerk user id.
    pub sub: String,
    /// Active billing plans, e.g. `u:premium` or `u:free_user,o:team`.
    #[serde(default)]
    pub pla: Option<String>,
}

impl SessionClaims {
    pub fn plan(&self) -> Plan {
        let premium = self
            .pla
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .any(|p| p == "premium" || p.ends_with(":premium"));

        if premium {
            Plan::Premium
        } else {
            Plan::Free
        }
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_session(&self, token: &str) -> Result<SessionClaims, AuthError>;

    /// Free-tier operations consumed so far; 0 when never recorded.
    async fn free_usage(&self, user_id: &str) -> Result<u32, AuthError>;

    async fn set_free_usage(&self, user_id: &str, count: u32) -> Result<(), AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(pla: Option<&str>) -> SessionClaims {
        SessionClaims {
            sub: "user_1".to_string(),
            pla: pla.map(String::from),
        }
    }

    #[test]
    fn test_plan_from_user_scoped_claim() {
        assert_eq!(claims(Some("u:premium")).plan(), Plan::Premium);
        assert_eq!(claims(Some("o:team, u:premium")).plan(), Plan::Premium);
    }

    #[test]
    fn test_plan_defaults_to_free() {
        assert_eq!(claims(None).plan(), Plan::Free);
        assert_eq!(claims(Some("u:free_user")).plan(), Plan::Free);
        assert_eq!(claims(Some("u:premium_trial_expired")).plan(), Plan::Free);
    }

    #[test]
    fn test_only_caller_faults_are_unauthenticated() {
        assert!(AuthError::MissingToken.is_unauthenticated());
        assert!(AuthError::InvalidToken("expired".to_string()).is_unauthenticated());
        assert!(!AuthError::Upstream(VendorError::EmptyContent("Clerk")).is_unauthenticated());
    }
}
