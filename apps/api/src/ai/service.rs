//! The six AI operations.
//!
//! Each one: quota gate, one vendor pipeline, one creation row, then the
//! free-tier counter bump for non-premium callers. The row insert and the
//! counter update are separate calls with no transaction between them; if the
//! counter update fails the creation stands and the miss is only logged.

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::ai::prompts::{
    remove_object_description, resume_review_prompt, REMOVE_BACKGROUND_DESCRIPTION,
    RESUME_REVIEW_DESCRIPTION,
};
use crate::ai::upload::UploadedFile;
use crate::errors::AppError;
use crate::media::to_data_url;
use crate::models::creation::{CreationType, NewCreation};
use crate::models::user::UserContext;
use crate::state::AppState;

const BLOG_TITLE_MAX_TOKENS: u32 = 100;
const RESUME_REVIEW_MAX_TOKENS: u32 = 1000;
const MAX_ARTICLE_TOKENS: u32 = 4096;
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;
const MAX_OBJECT_NAME_LEN: usize = 64;

const GENERATED_IMAGE_MIME: &str = "image/png";
const BACKGROUND_REMOVAL: &str = "e_background_removal";

pub const LIMIT_REACHED: &str = "Limit reached. Upgrade to continue.";
pub const PREMIUM_ONLY: &str = "This feature is for premium users only. Upgrade to continue.";

#[derive(Debug, Deserialize)]
pub struct ArticleRequest {
    pub prompt: String,
    /// Token budget for the article.
    pub length: u32,
}

#[derive(Debug, Deserialize)]
pub struct BlogTitleRequest {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    #[serde(default)]
    pub publish: bool,
}

pub async fn generate_article(
    state: &AppState,
    user: &UserContext,
    request: ArticleRequest,
) -> Result<String, AppError> {
    ensure_quota(user, LIMIT_REACHED)?;
    let prompt = require_prompt(request.prompt)?;
    if request.length == 0 || request.length > MAX_ARTICLE_TOKENS {
        return Err(AppError::Validation(format!(
            "length must be between 1 and {MAX_ARTICLE_TOKENS}"
        )));
    }

    let content = state.llm.complete(&prompt, request.length).await?;

    record(state, user, CreationType::Article, prompt, content, false).await
}

pub async fn generate_blog_title(
    state: &AppState,
    user: &UserContext,
    request: BlogTitleRequest,
) -> Result<String, AppError> {
    ensure_quota(user, LIMIT_REACHED)?;
    let prompt = require_prompt(request.prompt)?;

    let content = state.llm.complete(&prompt, BLOG_TITLE_MAX_TOKENS).await?;

    record(state, user, CreationType::BlogTitle, prompt, content, false).await
}

pub async fn generate_image(
    state: &AppState,
    user: &UserContext,
    request: ImageRequest,
) -> Result<String, AppError> {
    ensure_quota(user, PREMIUM_ONLY)?;
    let prompt = require_prompt(request.prompt)?;

    let png = state.images.text_to_image(&prompt).await?;
    let hosted = state
        .image_host
        .upload(to_data_url(GENERATED_IMAGE_MIME, &png), None)
        .await?;

    record(
        state,
        user,
        CreationType::Image,
        prompt,
        hosted.secure_url,
        request.publish,
    )
    .await
}

pub async fn remove_image_background(
    state: &AppState,
    user: &UserContext,
    image: UploadedFile,
) -> Result<String, AppError> {
    ensure_quota(user, PREMIUM_ONLY)?;

    let hosted = state
        .image_host
        .upload(
            to_data_url(&image.content_type, &image.bytes),
            Some(BACKGROUND_REMOVAL),
        )
        .await?;

    record(
        state,
        user,
        CreationType::Image,
        REMOVE_BACKGROUND_DESCRIPTION.to_string(),
        hosted.secure_url,
        false,
    )
    .await
}

pub async fn remove_image_object(
    state: &AppState,
    user: &UserContext,
    image: UploadedFile,
    object: &str,
) -> Result<String, AppError> {
    ensure_quota(user, PREMIUM_ONLY)?;
    let object = object.trim();
    let effect = gen_remove_effect(object)?;

    let hosted = state
        .image_host
        .upload(to_data_url(&image.content_type, &image.bytes), None)
        .await?;
    let image_url = state.image_host.transformed_url(&hosted.public_id, &effect);

    record(
        state,
        user,
        CreationType::Image,
        remove_object_description(object),
        image_url,
        false,
    )
    .await
}

pub async fn review_resume(
    state: &AppState,
    user: &UserContext,
    resume: UploadedFile,
) -> Result<String, AppError> {
    ensure_quota(user, PREMIUM_ONLY)?;
    if resume.bytes.len() > MAX_RESUME_BYTES {
        return Err(AppError::Validation(
            "Resume file size exceeds allowed size (5MB).".to_string(),
        ));
    }

    debug!(
        "Extracting text from {} ({} bytes)",
        resume.file_name.as_deref().unwrap_or("resume"),
        resume.bytes.len()
    );
    let resume_text = state.pdf.extract_text(resume.bytes).await?;
    let prompt = resume_review_prompt(&resume_text);

    let content = state.llm.complete(&prompt, RESUME_REVIEW_MAX_TOKENS).await?;

    record(
        state,
        user,
        CreationType::ResumeReview,
        RESUME_REVIEW_DESCRIPTION.to_string(),
        content,
        false,
    )
    .await
}

/// Fails with `message` once a non-premium caller has used up the free tier.
pub fn ensure_quota(user: &UserContext, message: &str) -> Result<(), AppError> {
    if user.quota_exhausted() {
        info!("User {} is out of free usage", user.user_id);
        return Err(AppError::LimitReached(message.to_string()));
    }
    Ok(())
}

fn require_prompt(prompt: String) -> Result<String, AppError> {
    if prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt cannot be empty".to_string()));
    }
    Ok(prompt)
}

/// Builds the generative-remove effect for the image host.
///
/// The object name is interpolated into the host's transformation syntax, so
/// anything that could open another directive (`/`, `,`, `:` ...) is refused.
fn gen_remove_effect(object: &str) -> Result<String, AppError> {
    if object.is_empty() {
        return Err(AppError::Validation(
            "Describe the object to remove".to_string(),
        ));
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_');
    if object.chars().count() > MAX_OBJECT_NAME_LEN || !object.chars().all(allowed) {
        return Err(AppError::Validation(format!(
            "Object name must be at most {MAX_OBJECT_NAME_LEN} letters, digits, spaces, '-' or '_'"
        )));
    }

    Ok(format!("e_gen_remove:{}", object.replace(' ', "%20")))
}

/// Appends the creation, then bumps the free-tier counter for non-premium callers.
async fn record(
    state: &AppState,
    user: &UserContext,
    kind: CreationType,
    prompt: String,
    content: String,
    publish: bool,
) -> Result<String, AppError> {
    let row = state
        .creations
        .insert(NewCreation {
            user_id: user.user_id.clone(),
            prompt,
            content,
            kind,
            publish,
        })
        .await?;

    if !user.is_premium() {
        let next = user.free_usage.saturating_add(1);
        if let Err(e) = state.identity.set_free_usage(&user.user_id, next).await {
            warn!(
                "Creation {} stored but free_usage update for {} failed: {e}",
                row.id, user.user_id
            );
        }
    }

    Ok(row.content)
}
