use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::auth::{AuthError, IdentityProvider};
use crate::errors::AppError;
use crate::models::user::{Plan, UserContext};
use crate::state::AppState;

/// Cookie the Clerk frontend SDK stores the session token in.
const SESSION_COOKIE: &str = "__session";

/// Rejects unauthenticated callers and attaches a `UserContext` to the request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(req.headers()).ok_or(AuthError::MissingToken)?;

    let user = resolve_user(state.identity.as_ref(), &token)
        .await
        .inspect_err(|e| warn!("Rejected request to {}: {e}", req.uri().path()))?;

    debug!(
        "Authenticated {} (plan={:?}, free_usage={})",
        user.user_id, user.plan, user.free_usage
    );

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Verifies the session and loads the caller's quota state.
///
/// Premium callers get their stored free-tier counter reset, so a later
/// downgrade starts from a clean allowance.
pub async fn resolve_user(
    identity: &dyn IdentityProvider,
    token: &str,
) -> Result<UserContext, AuthError> {
    let claims = identity.verify_session(token).await?;
    let plan = claims.plan();

    let mut free_usage = identity.free_usage(&claims.sub).await?;
    if plan == Plan::Premium && free_usage != 0 {
        identity.set_free_usage(&claims.sub, 0).await?;
        free_usage = 0;
    }

    Ok(UserContext {
        user_id: claims.sub,
        plan,
        free_usage,
    })
}

/// `Authorization: Bearer <jwt>` first, then the `__session` cookie.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
