use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::creations::store::CreationStore;
use crate::llm_client::ChatModel;
use crate::media::clipdrop::ImageSynthesizer;
use crate::media::cloudinary::ImageHost;
use crate::media::pdf::PdfReader;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Every external collaborator sits behind a trait object so the production
/// adapters can be swapped for in-memory ones in tests.
#[derive(Clone)]
pub struct AppState {
    pub creations: Arc<dyn CreationStore>,
    pub identity: Arc<dyn IdentityProvider>,
    /// Chat completions (Gemini).
    pub llm: Arc<dyn ChatModel>,
    /// Text-to-image (ClipDrop).
    pub images: Arc<dyn ImageSynthesizer>,
    /// Hosting and transformations (Cloudinary).
    pub image_host: Arc<dyn ImageHost>,
    pub pdf: Arc<dyn PdfReader>,
}
