//! Axum route handlers for `/api/user/*`.

use axum::{extract::State, Extension, Json};
use serde_json::Value;

use crate::envelope::respond;
use crate::errors::AppError;
use crate::models::user::UserContext;
use crate::state::AppState;

/// GET /api/user/get-user-creations
pub async fn handle_get_user_creations(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
) -> Json<Value> {
    let result = state
        .creations
        .list_for_user(&user.user_id)
        .await
        .map_err(AppError::from);
    respond("creations", result)
}

/// GET /api/user/get-published-creations
///
/// The community gallery: every creation flagged `publish`, from all users.
pub async fn handle_get_published_creations(State(state): State<AppState>) -> Json<Value> {
    let result = state
        .creations
        .list_published()
        .await
        .map_err(AppError::from);
    respond("creations", result)
}
