//! Axum route handlers for `/api/ai/*`.
//!
//! Every handler answers HTTP 200 with the `{success, content|message}` envelope,
//! including for malformed bodies.

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    Extension, Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ai::service::{self, ArticleRequest, BlogTitleRequest, ImageRequest};
use crate::ai::upload::{rejected_body, UploadForm};
use crate::envelope::respond;
use crate::errors::AppError;
use crate::models::user::UserContext;
use crate::state::AppState;

/// POST /api/ai/generate-article
pub async fn handle_generate_article(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    body: Result<Json<ArticleRequest>, JsonRejection>,
) -> Json<Value> {
    let result = match text_body(&user, body) {
        Ok(request) => service::generate_article(&state, &user, request).await,
        Err(e) => Err(e),
    };
    respond("content", result)
}

/// POST /api/ai/generate-blog-title
pub async fn handle_generate_blog_title(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    body: Result<Json<BlogTitleRequest>, JsonRejection>,
) -> Json<Value> {
    let result = match text_body(&user, body) {
        Ok(request) => service::generate_blog_title(&state, &user, request).await,
        Err(e) => Err(e),
    };
    respond("content", result)
}

/// POST /api/ai/generate-image
pub async fn handle_generate_image(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    body: Result<Json<ImageRequest>, JsonRejection>,
) -> Json<Value> {
    let result = match service::ensure_quota(&user, service::PREMIUM_ONLY)
        .and_then(|()| json_body(body))
    {
        Ok(request) => service::generate_image(&state, &user, request).await,
        Err(e) => Err(e),
    };
    respond("content", result)
}

/// POST /api/ai/remove-image-background
///
/// Multipart field `image`.
pub async fn handle_remove_image_background(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<Value> {
    respond("content", remove_background(&state, &user, multipart).await)
}

/// POST /api/ai/remove-image-object
///
/// Multipart field `image` plus text field `object`.
pub async fn handle_remove_image_object(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<Value> {
    respond("content", remove_object(&state, &user, multipart).await)
}

/// POST /api/ai/resume-review
///
/// Multipart field `resume` (PDF, at most 5MB).
pub async fn handle_resume_review(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<Value> {
    respond("content", review_resume(&state, &user, multipart).await)
}

/// The quota gate runs before the body is looked at.
fn text_body<T: DeserializeOwned>(
    user: &UserContext,
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    service::ensure_quota(user, service::LIMIT_REACHED)?;
    json_body(body)
}

fn json_body<T: DeserializeOwned>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(request)| request)
        .map_err(|e| rejected_body(e.status(), e.body_text()))
}

async fn remove_background(
    state: &AppState,
    user: &UserContext,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<String, AppError> {
    service::ensure_quota(user, service::PREMIUM_ONLY)?;
    let image = UploadForm::read(multipart).await?.take_file("image")?;
    service::remove_image_background(state, user, image).await
}

async fn remove_object(
    state: &AppState,
    user: &UserContext,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<String, AppError> {
    service::ensure_quota(user, service::PREMIUM_ONLY)?;
    let mut form = UploadForm::read(multipart).await?;
    let image = form.take_file("image")?;
    let object = form.field("object").unwrap_or_default().to_string();
    service::remove_image_object(state, user, image, &object).await
}

async fn review_resume(
    state: &AppState,
    user: &UserContext,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<String, AppError> {
    service::ensure_quota(user, service::PREMIUM_ONLY)?;
    let resume = UploadForm::read(multipart).await?.take_file("resume")?;
    service::review_resume(state, user, resume).await
}
